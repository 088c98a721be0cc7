use clap::Args;
use colored::Colorize;
use dm_core::{Catalog, StatKey, repo};
use dm_mechanics::MechError;
use dm_mechanics::edit::{self, ChangedFields, StatEditor};
use miette::{IntoDiagnostic, MietteDiagnostic, Report, bail, miette};

use super::{Paths, resolve_class, resolve_county, unknown};

#[derive(Args)]
pub struct EditArgs {
    /// Character id
    id: String,

    /// New name
    #[arg(long)]
    name: Option<String>,

    /// New class id or name; must suit the stats after any --stat changes
    #[arg(long)]
    class: Option<String>,

    /// New county id or name
    #[arg(long)]
    county: Option<String>,

    /// Step a stat up or down, e.g. STR+1 or dex-2; repeatable
    #[arg(long = "stat", allow_hyphen_values = true)]
    stats: Vec<String>,
}

/// Split `STR+1` into the stat and a signed step count.
fn parse_stat_change(catalog: &Catalog, input: &str) -> miette::Result<(StatKey, i32)> {
    let split = input
        .rfind(['+', '-'])
        .filter(|i| *i > 0)
        .ok_or_else(|| miette!("expected a stat change like STR+1, got '{input}'"))?;
    let (stat, delta) = input.split_at(split);
    let delta: i32 = delta
        .parse()
        .map_err(|_| miette!("expected a stat change like STR+1, got '{input}'"))?;
    let key = catalog
        .stat_by_abbreviation(stat)
        .or_else(|| {
            catalog
                .stats
                .iter()
                .find(|s| s.id == stat || s.name.eq_ignore_ascii_case(stat))
        })
        .and_then(|s| s.key())
        .ok_or_else(|| unknown("stat", stat, catalog.stats.iter().map(|s| s.abbreviation.as_str())))?;
    Ok((key, delta))
}

fn merge(fields: &mut ChangedFields, changed: ChangedFields) {
    for field in changed {
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
}

pub fn run(paths: &Paths, args: EditArgs) -> miette::Result<()> {
    let catalog = paths.catalog()?;
    let config = paths.config()?;
    let mut store = paths.store()?;

    let mut character = repo::fetch_character(&store, &args.id).into_diagnostic()?;
    let mut fields = ChangedFields::new();
    let mut notes = Vec::new();

    if let Some(name) = args.name {
        let name = name.trim();
        if name.is_empty() {
            bail!("name cannot be blank");
        }
        merge(&mut fields, edit::rename(&mut character, name));
    }

    if !args.stats.is_empty() {
        let mut editor = StatEditor::for_character(&character, &catalog, &config);
        for change in &args.stats {
            let (key, delta) = parse_stat_change(&catalog, change)?;
            for _ in 0..delta.unsigned_abs() {
                if delta > 0 {
                    editor.increment(key);
                } else {
                    editor.decrement(key);
                }
            }
            notes.push(format!(
                "{} {}",
                catalog.stat_abbreviation(key.id()),
                editor.stats().get(key)
            ));
        }
        merge(&mut fields, edit::set_stats(&mut character, editor.into_stats()));
    }

    if let Some(class) = args.class.as_deref() {
        let class = resolve_class(&catalog, class)?;
        if class.id != character.class_id {
            match edit::change_class(&mut character, &class.id, &catalog) {
                Err(MechError::IneligibleClass(_)) => {
                    let diagnostic =
                        MietteDiagnostic::new(format!("stats do not qualify for {}", class.name))
                            .with_help("raise the stats first with --stat");
                    return Err(Report::new(diagnostic));
                }
                changed => merge(&mut fields, changed.into_diagnostic()?),
            }
            notes.push(format!("now a {}; skills were cleared", class.name));
        }
    }

    if let Some(county) = args.county.as_deref() {
        let county = resolve_county(&catalog, county)?;
        merge(
            &mut fields,
            edit::change_county(&mut character, &county.id, &catalog).into_diagnostic()?,
        );
    }

    if fields.is_empty() {
        bail!("nothing to change; pass --name, --class, --county or --stat");
    }
    repo::persist_edit(&mut store, &character, &fields).into_diagnostic()?;

    println!("Updated {} ({})", character.name.bold(), character.id);
    for note in notes {
        println!("  {}", note.dimmed());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(include_str!("../../assets/catalog.json")).unwrap()
    }

    #[test]
    fn stat_changes_parse_abbreviations_and_names() {
        let catalog = catalog();
        assert_eq!(parse_stat_change(&catalog, "STR+1").unwrap(), (StatKey::Strength, 1));
        assert_eq!(parse_stat_change(&catalog, "dex-2").unwrap(), (StatKey::Dexterity, -2));
        assert_eq!(
            parse_stat_change(&catalog, "Wisdom+3").unwrap(),
            (StatKey::Wisdom, 3)
        );
    }

    #[test]
    fn malformed_stat_changes_fail() {
        let catalog = catalog();
        assert!(parse_stat_change(&catalog, "STR").is_err());
        assert!(parse_stat_change(&catalog, "STR+x").is_err());
        assert!(parse_stat_change(&catalog, "LCK+1").is_err());
    }
}
