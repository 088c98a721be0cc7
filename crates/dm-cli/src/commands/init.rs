use std::fs;
use std::path::Path;

use miette::{IntoDiagnostic, WrapErr, bail};

const STARTER_CATALOG: &str = include_str!("../../assets/catalog.json");
const STARTER_RULES: &str = include_str!("../../assets/rules.json");

pub fn run(dir: &Path) -> miette::Result<()> {
    let catalog = dir.join("catalog.json");
    if catalog.exists() {
        bail!("'{}' already exists", catalog.display());
    }

    fs::create_dir_all(dir.join("store"))
        .into_diagnostic()
        .wrap_err("cannot create store directory")?;
    fs::write(&catalog, STARTER_CATALOG)
        .into_diagnostic()
        .wrap_err("cannot write catalog.json")?;
    fs::write(dir.join("rules.json"), STARTER_RULES)
        .into_diagnostic()
        .wrap_err("cannot write rules.json")?;

    println!("Initialized Dice Mice in {}/", dir.display());
    println!("  catalog.json  stats, counties, classes, skills, derived stats");
    println!("  rules.json    table rules (exempt classes, level caps)");
    println!("  store/        house and character records");
    println!();
    println!("Get started:");
    println!("  dm check                                     # Validate the catalog");
    println!("  dm house create --player me --name Bramble --county thornwood");
    println!("  dm create --player me --county thornwood --class thief --name Pip");
    println!("  dm sheet <id>                                # Show the sheet");

    Ok(())
}
