pub mod check;
pub mod classes;
pub mod create;
pub mod edit;
pub mod house;
pub mod hp;
pub mod init;
pub mod level;
pub mod roll;
pub mod sheet;
pub mod skill;

use std::path::{Path, PathBuf};

use dm_core::{BaseStatBlock, Catalog, Class, County, JsonDirStore, Skill, SkillLevel};
use dm_mechanics::RulesConfig;
use miette::{IntoDiagnostic, MietteDiagnostic, Report, WrapErr, bail, miette};
use rand::SeedableRng;
use rand::rngs::StdRng;
use strsim::jaro_winkler;

/// Minimum similarity for a "did you mean" suggestion (0.0-1.0).
const SUGGEST_THRESHOLD: f64 = 0.8;

/// File locations shared by every command.
pub struct Paths {
    pub catalog: PathBuf,
    pub store: PathBuf,
    pub config: Option<PathBuf>,
}

impl Paths {
    /// Load the reference catalog.
    pub fn catalog(&self) -> miette::Result<Catalog> {
        Catalog::from_path(&self.catalog)
            .into_diagnostic()
            .wrap_err_with(|| format!("cannot load catalog {}", self.catalog.display()))
    }

    /// Load the rules config: the `--config` file, else `rules.json` beside
    /// the catalog, else the defaults.
    pub fn config(&self) -> miette::Result<RulesConfig> {
        let beside_catalog = self
            .catalog
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("rules.json");
        let path = match &self.config {
            Some(path) => path.clone(),
            None if beside_catalog.exists() => beside_catalog,
            None => return Ok(RulesConfig::default()),
        };
        RulesConfig::from_path(&path)
            .into_diagnostic()
            .wrap_err_with(|| format!("cannot load rules config {}", path.display()))
    }

    /// Open the record store, creating its directory if needed.
    pub fn store(&self) -> miette::Result<JsonDirStore> {
        JsonDirStore::open(&self.store)
            .into_diagnostic()
            .wrap_err_with(|| format!("cannot open store {}", self.store.display()))
    }
}

/// A seeded RNG, or one seeded from the OS.
pub fn rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// The closest candidate to `input`, if any is close enough.
pub fn suggest<'a>(input: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let input = input.to_lowercase();
    candidates
        .into_iter()
        .map(|c| (c, jaro_winkler(&input, &c.to_lowercase())))
        .filter(|(_, score)| *score >= SUGGEST_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(c, _)| c)
}

/// An "unknown thing" error with a suggestion when one is close.
pub fn unknown<'a>(kind: &str, input: &str, candidates: impl IntoIterator<Item = &'a str>) -> Report {
    let diagnostic = MietteDiagnostic::new(format!("unknown {kind} '{input}'"));
    match suggest(input, candidates) {
        Some(candidate) => Report::new(diagnostic.with_help(format!("did you mean '{candidate}'?"))),
        None => Report::new(diagnostic),
    }
}

fn matches(input: &str, id: &str, name: &str) -> bool {
    id == input || name.eq_ignore_ascii_case(input)
}

/// Find a class by id or name.
pub fn resolve_class<'a>(catalog: &'a Catalog, input: &str) -> miette::Result<&'a Class> {
    catalog
        .classes
        .iter()
        .find(|c| matches(input, &c.id, &c.name))
        .ok_or_else(|| unknown("class", input, catalog.classes.iter().map(|c| c.id.as_str())))
}

/// Find a county by id or name.
pub fn resolve_county<'a>(catalog: &'a Catalog, input: &str) -> miette::Result<&'a County> {
    catalog
        .counties
        .iter()
        .find(|c| matches(input, &c.id, &c.name))
        .ok_or_else(|| unknown("county", input, catalog.counties.iter().map(|c| c.id.as_str())))
}

/// Find a skill by id or name.
pub fn resolve_skill<'a>(catalog: &'a Catalog, input: &str) -> miette::Result<&'a Skill> {
    catalog
        .skills
        .iter()
        .find(|s| matches(input, &s.id, &s.name))
        .ok_or_else(|| unknown("skill", input, catalog.skills.iter().map(|s| s.id.as_str())))
}

/// Find a skill rank by id or name.
pub fn resolve_rank<'a>(catalog: &'a Catalog, input: &str) -> miette::Result<&'a SkillLevel> {
    catalog
        .skill_levels
        .iter()
        .find(|l| matches(input, &l.id, &l.name))
        .ok_or_else(|| unknown("skill rank", input, catalog.skill_levels.iter().map(|l| l.id.as_str())))
}

/// Build a stat block from six scores in stat-block order.
pub fn stat_block(scores: &[i32]) -> miette::Result<BaseStatBlock> {
    let scores: [i32; 6] = scores
        .try_into()
        .map_err(|_| miette!("expected 6 stat scores (STR,CON,DEX,INT,WIS,CHA), got {}", scores.len()))?;
    if scores.iter().any(|s| *s < 0) {
        bail!("stat scores cannot be negative");
    }
    Ok(BaseStatBlock::from_scores(scores))
}

/// Format a modifier with an explicit sign.
pub fn signed(n: i32) -> String {
    if n >= 0 { format!("+{n}") } else { n.to_string() }
}
