use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use dm_core::StatKey;
use dm_mechanics::{AbilityRollMethod, modifier, roll_level_hp};
use miette::IntoDiagnostic;

use super::{Paths, resolve_county, rng, signed};

pub fn abilities(paths: &Paths, county: Option<&str>, seed: Option<u64>) -> miette::Result<()> {
    let catalog = county.map(|_| paths.catalog()).transpose()?;
    let associated = match (&catalog, county) {
        (Some(catalog), Some(county)) => resolve_county(catalog, county)?.associated_stat(),
        _ => None,
    };

    let mut rng = rng(seed);
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Stat", "Method", "Dice", "Score", "Mod"]);

    for key in StatKey::ALL {
        let method = AbilityRollMethod::for_stat(associated == Some(key));
        let roll = method.roll(&mut rng);
        let score = roll.total() as i32;
        let label = match &catalog {
            Some(catalog) => catalog.stat_abbreviation(key.id()),
            None => key.id().to_string(),
        };
        let (method_label, dice) = match method {
            AbilityRollMethod::Standard => ("3d6", roll.to_string()),
            AbilityRollMethod::Preferred => {
                let dropped: Vec<String> = roll.dropped.iter().map(|d| d.value.to_string()).collect();
                ("4d6 drop lowest", format!("{roll} (dropped {})", dropped.join(", ")))
            }
        };
        table.add_row(vec![
            label,
            method_label.to_string(),
            dice,
            score.to_string(),
            signed(modifier(score)),
        ]);
    }

    println!("{table}");
    Ok(())
}

pub fn hp(hit_die: &str, con_mod: i32, seed: Option<u64>) -> miette::Result<()> {
    let mut rng = rng(seed);
    let hp = roll_level_hp(hit_die, con_mod, &mut rng).into_diagnostic()?;
    println!(
        "{} {}",
        format!("{hit_die} (CON {})", signed(con_mod)).dimmed(),
        hp.to_string().bold()
    );
    Ok(())
}
