use clap::Args;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use dm_core::{BaseStatBlock, Catalog, Skill, repo};
use dm_mechanics::{SkillEditor, edit};
use miette::{IntoDiagnostic, MietteDiagnostic, Report};

use super::{Paths, resolve_rank, resolve_skill, signed};

#[derive(Args)]
pub struct SkillArgs {
    /// Character id
    id: String,

    /// Skill id or name (omit to list every skill)
    skill: Option<String>,

    /// Rank id or name to take
    rank: Option<String>,

    /// Drop the skill from the selection
    #[arg(long, conflicts_with = "rank")]
    remove: bool,

    /// Designate or undesignate the skill as a class skill
    #[arg(long)]
    class_skill: bool,
}

fn refused(message: String, help: String) -> Report {
    Report::new(MietteDiagnostic::new(message).with_help(help))
}

pub fn run(paths: &Paths, args: SkillArgs) -> miette::Result<()> {
    let catalog = paths.catalog()?;
    let config = paths.config()?;
    let mut store = paths.store()?;

    let mut character = repo::fetch_character(&store, &args.id).into_diagnostic()?;
    let stats = character.current_base_stats;
    let mut editor = SkillEditor::for_character(&character, &catalog, &config).into_diagnostic()?;
    let mut changed = editor.grant_class_competency() > 0;

    let Some(skill) = args.skill.as_deref() else {
        print_skills(&catalog, &editor, &stats);
        return Ok(());
    };
    let skill = resolve_skill(&catalog, skill)?;

    if args.class_skill {
        if !editor.toggle_chosen_class_skill(&skill.id) {
            return Err(refused(
                format!("cannot designate {} as a class skill", skill.name),
                format!(
                    "only classes that choose their class skills can, up to {} at this level",
                    editor.ranks_available()
                ),
            ));
        }
        changed = true;
    }

    if args.remove {
        if editor.deselect(&skill.id) {
            changed = true;
        } else if !args.class_skill {
            println!("  {}", format!("{} was not selected.", skill.name).dimmed());
        }
    } else if let Some(rank) = args.rank.as_deref() {
        let rank = resolve_rank(&catalog, rank)?;
        if !editor.select(&skill.id, &rank.id) {
            let help = match editor.rank_options(&skill.id).iter().find(|o| o.rank_id == rank.id) {
                Some(option) => format!(
                    "{} needs level {} and costs {}; {} of {} points left",
                    option.name,
                    option.required_level,
                    option.cost,
                    editor.available_points(),
                    editor.ranks_available()
                ),
                None => format!("{} cannot be chosen directly", rank.name),
            };
            return Err(refused(format!("cannot take {} at {}", skill.name, rank.name), help));
        }
        changed = true;
    } else if !args.class_skill {
        print_rank_options(&editor, skill);
    }

    if !changed {
        return Ok(());
    }

    let rank = editor
        .current_rank(&skill.id)
        .map_or_else(|| "Untrained".to_string(), |r| catalog.skill_level_name(r));
    let points = editor.available_points();
    let fields = edit::set_skills(&mut character, editor);
    repo::persist_edit(&mut store, &character, &fields).into_diagnostic()?;

    println!("{}: {rank} ({points} points left)", skill.name.bold());
    Ok(())
}

fn print_skills(catalog: &Catalog, editor: &SkillEditor<'_>, stats: &BaseStatBlock) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Skill", "Stat", "Rank", "Class", "Total"]);
    for skill in &catalog.skills {
        let rank = editor
            .current_rank(&skill.id)
            .map(|r| catalog.skill_level_name(r))
            .unwrap_or_default();
        let class_skill = if editor.is_class_skill(&skill.id) { "yes" } else { "" };
        table.add_row(vec![
            skill.name.clone(),
            catalog.stat_abbreviation(&skill.associated_stat_id),
            rank,
            class_skill.to_string(),
            signed(editor.total_for_skill(skill, stats)),
        ]);
    }
    println!("{table}");
    println!(
        "  {}",
        format!(
            "{} of {} points left",
            editor.available_points(),
            editor.ranks_available()
        )
        .dimmed()
    );
}

fn print_rank_options(editor: &SkillEditor<'_>, skill: &Skill) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Rank", "Cost", "Level", "Status"]);
    for option in editor.rank_options(&skill.id) {
        let status = if option.selected {
            "selected".green().to_string()
        } else if option.selectable {
            "available".to_string()
        } else {
            "locked".dimmed().to_string()
        };
        table.add_row(vec![
            option.name,
            option.cost.to_string(),
            option.required_level.to_string(),
            status,
        ]);
    }
    println!("{}", skill.name.bold());
    println!("{table}");
}
