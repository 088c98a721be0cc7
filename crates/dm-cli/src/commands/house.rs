use chrono::Utc;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use dm_core::{HouseDraft, repo};
use miette::{IntoDiagnostic, bail, miette};
use serde_json::{Map, Value};

use super::{Paths, resolve_county};

pub fn create(
    paths: &Paths,
    player: &str,
    name: &str,
    county: &str,
    motto: &str,
    bio: &str,
) -> miette::Result<()> {
    let catalog = paths.catalog()?;
    let mut store = paths.store()?;

    if let Some(existing) = repo::house_by_player(&store, player).into_diagnostic()? {
        bail!("player '{player}' already has a house: {}", existing.name);
    }

    let county = resolve_county(&catalog, county)?;
    let draft = HouseDraft {
        name: name.to_string(),
        motto: motto.to_string(),
        county_id: county.id.clone(),
        bio: bio.to_string(),
    };
    let house = draft
        .into_house(player, Utc::now())
        .map_err(|errors| miette!("{}", errors.join("; ")))?;
    let house = repo::create_house(&mut store, &house).into_diagnostic()?;

    println!("Founded {} ({}) in {}", house.name.bold(), house.id, county.name);
    if !house.motto.is_empty() {
        println!("  {}", format!("\"{}\"", house.motto).italic());
    }
    Ok(())
}

/// New values for a house; `None` leaves a field as it is.
pub struct HouseEdit {
    pub name: Option<String>,
    pub motto: Option<String>,
    pub bio: Option<String>,
    pub gold: Option<i64>,
}

pub fn edit(paths: &Paths, player: &str, changes: HouseEdit) -> miette::Result<()> {
    let mut store = paths.store()?;

    let Some(house) = repo::house_by_player(&store, player).into_diagnostic()? else {
        bail!("No House Found for player '{player}'");
    };

    let mut fields = Map::new();
    if let Some(name) = changes.name {
        let name = name.trim();
        if name.is_empty() {
            bail!("House name is required");
        }
        fields.insert("name".to_string(), Value::from(name));
    }
    if let Some(motto) = changes.motto {
        fields.insert("motto".to_string(), Value::from(motto));
    }
    if let Some(bio) = changes.bio {
        fields.insert("bio".to_string(), Value::from(bio));
    }
    if let Some(gold) = changes.gold {
        fields.insert("gold".to_string(), Value::from(gold));
    }
    if fields.is_empty() {
        bail!("nothing to change; pass --name, --motto, --bio or --gold");
    }

    repo::update_house(&mut store, &house.id, fields).into_diagnostic()?;
    let house = repo::fetch_house(&store, &house.id).into_diagnostic()?;
    println!("Updated {} ({})", house.name.bold(), house.id);
    println!("  {}", format!("{} gold", house.gold).dimmed());
    Ok(())
}

pub fn show(paths: &Paths, player: &str) -> miette::Result<()> {
    let catalog = paths.catalog()?;
    let store = paths.store()?;

    let Some(house) = repo::house_by_player(&store, player).into_diagnostic()? else {
        bail!("No House Found for player '{player}'");
    };

    println!("{}", house.name.bold());
    if !house.motto.is_empty() {
        println!("  {}", format!("\"{}\"", house.motto).italic());
    }
    println!(
        "  {}",
        format!("{}, {} gold", catalog.county_name(&house.county_id), house.gold).dimmed()
    );

    let characters = repo::characters_by_house(&store, &house.id).into_diagnostic()?;
    if characters.is_empty() {
        println!("  No characters yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Class", "Level", "HP", "Id"]);
    for c in &characters {
        table.add_row(vec![
            c.name.clone(),
            catalog.class_name(&c.class_id),
            c.level.to_string(),
            c.total_hp().to_string(),
            c.id.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}
