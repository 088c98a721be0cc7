use colored::Colorize;
use dm_core::repo;
use dm_mechanics::edit;
use miette::IntoDiagnostic;

use super::Paths;

pub fn run(paths: &Paths, id: &str, level: u32) -> miette::Result<()> {
    let config = paths.config()?;
    let mut store = paths.store()?;

    let mut character = repo::fetch_character(&store, id).into_diagnostic()?;
    let previous = character.level;
    let fields = edit::change_level(&mut character, level, &config).into_diagnostic()?;
    repo::persist_edit(&mut store, &character, &fields).into_diagnostic()?;

    println!("{} is now level {level} (was {previous})", character.name.bold());
    if fields.contains(&"skills") {
        println!("  {}", "Skills were cleared; choose them again with `dm skill`.".yellow());
    } else if level > previous {
        println!(
            "  {}",
            format!("Roll hit points for the new levels with `dm hp {id} --roll-missing`.").dimmed()
        );
    }
    Ok(())
}
