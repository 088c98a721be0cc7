use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use dm_mechanics::eligibility::unmet_prerequisites;

use super::{Paths, stat_block};

pub fn run(paths: &Paths, scores: &[i32]) -> miette::Result<()> {
    let catalog = paths.catalog()?;
    let stats = stat_block(scores)?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Class", "Eligible", "Unmet prerequisites"]);

    let mut eligible = 0;
    for class in &catalog.classes {
        let unmet: Vec<String> = unmet_prerequisites(&stats, class)
            .into_iter()
            .map(|p| format!("{} {}", catalog.stat_abbreviation(&p.stat), p.min))
            .collect();
        let status = if unmet.is_empty() {
            eligible += 1;
            "yes".green().to_string()
        } else {
            "no".red().to_string()
        };
        table.add_row(vec![class.name.clone(), status, unmet.join(", ")]);
    }

    println!("{table}");
    println!("  {}", format!("{eligible} eligible class(es)").dimmed());
    Ok(())
}
