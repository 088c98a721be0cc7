use colored::Colorize;
use dm_mechanics::formula::render_errors;
use dm_mechanics::validate::formula_problems;
use dm_mechanics::validate_catalog;
use miette::bail;

use super::Paths;

pub fn run(paths: &Paths) -> miette::Result<()> {
    let catalog = paths.catalog()?;
    let config = paths.config()?;

    for problem in formula_problems(&catalog) {
        eprint!("{}", render_errors(&problem.source, &problem.entity, &problem.errors));
    }

    let issues = validate_catalog(&catalog, &config);
    let mut errors = 0;
    for issue in &issues {
        if issue.is_error {
            errors += 1;
            eprintln!("{}: {}: {}", "error".red().bold(), issue.entity, issue.message);
        } else {
            eprintln!("{}: {}: {}", "warning".yellow().bold(), issue.entity, issue.message);
        }
    }

    if errors > 0 {
        bail!("catalog has {errors} error(s)");
    }

    println!("  All checks passed.");
    println!(
        "  {} stats, {} counties, {} classes, {} skills, {} derived stats",
        catalog.stats.len(),
        catalog.counties.len(),
        catalog.classes.len(),
        catalog.skills.len(),
        catalog.derived_stats.len()
    );
    let warnings = issues.len();
    if warnings > 0 {
        println!("  {}", format!("{warnings} warning(s)").dimmed());
    }

    Ok(())
}
