use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use dm_core::class::format_number;
use dm_core::repo;
use dm_mechanics::CharacterSheet;
use miette::IntoDiagnostic;

use super::{Paths, signed};

pub fn run(paths: &Paths, id: &str, json: bool) -> miette::Result<()> {
    let catalog = paths.catalog()?;
    let config = paths.config()?;
    let store = paths.store()?;

    let character = repo::fetch_character(&store, id).into_diagnostic()?;
    let sheet = CharacterSheet::build(&character, &catalog, &config).into_diagnostic()?;

    if json {
        let out = serde_json::to_string_pretty(&sheet).into_diagnostic()?;
        println!("{out}");
        return Ok(());
    }

    print_sheet(&sheet);
    Ok(())
}

fn print_sheet(sheet: &CharacterSheet) {
    println!("{}", sheet.name.bold());
    if !sheet.trait_.is_empty() {
        println!("  {}", sheet.trait_.italic());
    }
    println!(
        "  Level {} {} from {}  ({} XP)",
        sheet.level, sheet.class, sheet.county, sheet.xp
    );
    println!(
        "  HP {}  Hit die {}  Willpower {}  Initiative {}",
        sheet.total_hp, sheet.hit_die, sheet.willpower, sheet.initiative
    );
    if !sheet.bio.is_empty() {
        println!();
        println!("  {}", sheet.bio.dimmed());
    }
    println!();

    let mut stats = Table::new();
    stats.set_content_arrangement(ContentArrangement::Dynamic);
    stats.set_header(vec!["Stat", "Score", "Mod"]);
    for m in &sheet.modifiers {
        stats.add_row(vec![m.abbreviation.clone(), m.score.to_string(), signed(m.modifier)]);
    }
    println!("{stats}");

    let mut combat = Table::new();
    combat.set_content_arrangement(ContentArrangement::Dynamic);
    combat.set_header(vec!["Defense", "Value", "Offense", "Value"]);
    let rows = sheet.defense.len().max(sheet.offense.len());
    for i in 0..rows {
        let (defense, defense_value) = sheet
            .defense
            .get(i)
            .map(|d| (d.name.clone(), format_number(d.value)))
            .unwrap_or_default();
        let (offense, offense_value) = sheet
            .offense
            .get(i)
            .map(|o| (o.name.clone(), o.value.to_string()))
            .unwrap_or_default();
        combat.add_row(vec![defense, defense_value, offense, offense_value]);
    }
    if rows > 0 {
        println!("{combat}");
    }

    if !sheet.skills.is_empty() {
        let mut skills = Table::new();
        skills.set_content_arrangement(ContentArrangement::Dynamic);
        skills.set_header(vec!["Skill", "Rank", "Stat", "Total"]);
        for line in &sheet.skills {
            let name = if line.class_skill {
                format!("{} *", line.name)
            } else {
                line.name.clone()
            };
            skills.add_row(vec![name, line.rank.clone(), line.stat.clone(), signed(line.total)]);
        }
        println!("{skills}");
    }

    let hp: Vec<String> = sheet
        .hp_by_level
        .iter()
        .map(|(level, hp)| format!("L{level} {hp}"))
        .collect();
    println!("  {}", format!("HP by level: {}", hp.join(", ")).dimmed());
}
