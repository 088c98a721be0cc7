use clap::Args;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use dm_core::repo;
use dm_mechanics::{HpProgressionEditor, edit};
use miette::IntoDiagnostic;

use super::{Paths, rng};

#[derive(Args)]
pub struct HpArgs {
    /// Character id
    id: String,

    /// Level to roll, or to set with --set
    #[arg(long)]
    level: Option<u32>,

    /// Enter hit points for --level by hand instead of rolling
    #[arg(long, requires = "level", allow_hyphen_values = true)]
    set: Option<i64>,

    /// Roll every level up to the current one that has no hit points yet
    #[arg(long, conflicts_with = "level")]
    roll_missing: bool,

    /// RNG seed for repeatable rolls
    #[arg(long)]
    seed: Option<u64>,
}

pub fn run(paths: &Paths, args: HpArgs) -> miette::Result<()> {
    let catalog = paths.catalog()?;
    let config = paths.config()?;
    let mut store = paths.store()?;

    let mut character = repo::fetch_character(&store, &args.id).into_diagnostic()?;
    let mut editor = HpProgressionEditor::for_character(&character, &catalog, &config);
    let mut rng = rng(args.seed);

    match (args.level, args.set) {
        (Some(level), Some(hp)) => editor.set(level, hp).into_diagnostic()?,
        (Some(level), None) => {
            editor.roll(level, &mut rng).into_diagnostic()?;
        }
        (None, _) if args.roll_missing => editor.roll_missing(&mut rng).into_diagnostic()?,
        (None, _) => {
            print_progression(&editor, character.level);
            return Ok(());
        }
    }

    let fields = edit::set_hp(&mut character, editor);
    repo::persist_edit(&mut store, &character, &fields).into_diagnostic()?;

    let levels: Vec<String> = character
        .hp_progression
        .iter()
        .take_while(|(level, _)| *level <= character.level)
        .map(|(level, hp)| format!("L{level} {hp}"))
        .collect();
    println!("{}: {} HP", character.name.bold(), character.total_hp());
    println!("  {}", levels.join(", ").dimmed());
    Ok(())
}

fn print_progression(editor: &HpProgressionEditor, current: u32) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Level", "HP", "Status"]);
    for level in 1..=current {
        let status = if !editor.is_editable(level) {
            "locked".dimmed().to_string()
        } else if editor.get(level) == 0 {
            "missing".yellow().to_string()
        } else {
            String::new()
        };
        table.add_row(vec![level.to_string(), editor.get(level).to_string(), status]);
    }
    println!("{table}");
    println!(
        "  {}",
        format!("{} HP on {}", editor.total(), editor.hit_die_label()).dimmed()
    );
}
