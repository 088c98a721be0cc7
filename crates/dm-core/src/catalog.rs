//! The reference catalog: stats, counties, classes, skills, ranks, derived
//! stats, and the initiative chart.
//!
//! Loaded once per session and read-only afterwards. Lookups return
//! `Option`; the `*_name` helpers fall back to a display placeholder and log
//! the miss, since character records may reference catalog entries that no
//! longer exist.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::class::Class;
use crate::county::County;
use crate::derived::{DerivedStat, DerivedStatKind};
use crate::error::CoreResult;
use crate::initiative::InitiativeChart;
use crate::skill::{Skill, SkillLevel};
use crate::stat::Stat;

/// All reference collections the rules need.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Ability stats, sorted by display order.
    #[serde(default)]
    pub stats: Vec<Stat>,
    /// Counties.
    #[serde(default)]
    pub counties: Vec<County>,
    /// Classes.
    #[serde(default)]
    pub classes: Vec<Class>,
    /// Skills.
    #[serde(default)]
    pub skills: Vec<Skill>,
    /// Skill ranks, sorted by display order.
    #[serde(default)]
    pub skill_levels: Vec<SkillLevel>,
    /// Derived-stat definitions.
    #[serde(default)]
    pub derived_stats: Vec<DerivedStat>,
    /// Initiative chart.
    #[serde(default)]
    pub initiative_chart: InitiativeChart,
}

impl Catalog {
    /// Parse a catalog from JSON and sort the ordered collections.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let mut catalog: Self = serde_json::from_str(json)?;
        catalog.sort();
        Ok(catalog)
    }

    /// Read and parse a catalog file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Sort stats and skill ranks by their display order.
    pub fn sort(&mut self) {
        self.stats.sort_by_key(|s| s.order);
        self.skill_levels.sort_by_key(|l| l.order);
    }

    /// Stat by id.
    pub fn stat(&self, id: &str) -> Option<&Stat> {
        self.stats.iter().find(|s| s.id == id)
    }

    /// Stat by formula abbreviation (case-insensitive).
    pub fn stat_by_abbreviation(&self, abbreviation: &str) -> Option<&Stat> {
        self.stats
            .iter()
            .find(|s| s.abbreviation.eq_ignore_ascii_case(abbreviation))
    }

    /// County by id.
    pub fn county(&self, id: &str) -> Option<&County> {
        self.counties.iter().find(|c| c.id == id)
    }

    /// Class by id.
    pub fn class(&self, id: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.id == id)
    }

    /// Skill by id.
    pub fn skill(&self, id: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }

    /// Skill rank by id.
    pub fn skill_level(&self, id: &str) -> Option<&SkillLevel> {
        self.skill_levels.iter().find(|l| l.id == id)
    }

    /// Derived stats of one kind, in catalog order.
    pub fn derived_stats_of(&self, kind: &DerivedStatKind) -> impl Iterator<Item = &DerivedStat> {
        self.derived_stats.iter().filter(move |d| &d.kind == kind)
    }

    /// County display name.
    pub fn county_name(&self, id: &str) -> String {
        display_name(self.county(id).map(|c| c.name.as_str()), "county", id, "No County Found.")
    }

    /// Class display name.
    pub fn class_name(&self, id: &str) -> String {
        display_name(self.class(id).map(|c| c.name.as_str()), "class", id, "No Class Found.")
    }

    /// Stat display name.
    pub fn stat_name(&self, id: &str) -> String {
        display_name(self.stat(id).map(|s| s.name.as_str()), "stat", id, "No Stat Found.")
    }

    /// Stat abbreviation, or `"__"` when the stat is unknown.
    pub fn stat_abbreviation(&self, id: &str) -> String {
        display_name(self.stat(id).map(|s| s.abbreviation.as_str()), "stat", id, "__")
    }

    /// Skill display name.
    pub fn skill_name(&self, id: &str) -> String {
        display_name(self.skill(id).map(|s| s.name.as_str()), "skill", id, "No Skill Found.")
    }

    /// Skill rank display name.
    pub fn skill_level_name(&self, id: &str) -> String {
        display_name(
            self.skill_level(id).map(|l| l.name.as_str()),
            "skill level",
            id,
            "No Skill Level Found.",
        )
    }
}

fn display_name(found: Option<&str>, what: &str, id: &str, placeholder: &str) -> String {
    match found {
        Some(name) => name.to_string(),
        None => {
            warn!(what, id, "reference lookup missed");
            placeholder.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "stats": [
            {"id": "dexterity", "name": "Dexterity", "abbreviation": "DEX", "order": 3},
            {"id": "strength", "name": "Strength", "abbreviation": "STR", "order": 1}
        ],
        "counties": [{"id": "barley", "name": "Barley Downs", "associatedStatId": "dexterity"}],
        "skill_levels": [
            {"id": "trained", "name": "Trained", "order": 2, "cost": 2},
            {"id": "skilled", "name": "Skilled", "order": 1, "cost": 1}
        ],
        "derived_stats": [
            {"id": "defense", "name": "Defense", "type": "DEFENSE", "formula": "base", "variables": ["base"]},
            {"id": "attack", "name": "Attack", "type": "NON-CALCULATED"}
        ],
        "initiative_chart": {"initiativeDice": [{"modifier": 0, "diceRolled": "1d6"}]}
    }"#;

    #[test]
    fn loading_sorts_ordered_collections() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.stats[0].id, "strength");
        assert_eq!(catalog.skill_levels[0].id, "skilled");
    }

    #[test]
    fn lookups() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.stat_by_abbreviation("dex").unwrap().id, "dexterity");
        assert_eq!(catalog.county("barley").unwrap().name, "Barley Downs");
        assert_eq!(catalog.skill_level("trained").unwrap().cost, 2);
        assert_eq!(
            catalog.derived_stats_of(&DerivedStatKind::Defense).count(),
            1
        );
        assert_eq!(catalog.initiative_chart.entries.len(), 1);
    }

    #[test]
    fn missing_lookups_use_placeholders() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.county_name("nowhere"), "No County Found.");
        assert_eq!(catalog.class_name("nobody"), "No Class Found.");
        assert_eq!(catalog.stat_name("luck"), "No Stat Found.");
        assert_eq!(catalog.stat_abbreviation("luck"), "__");
        assert_eq!(catalog.skill_name("juggling"), "No Skill Found.");
        assert_eq!(catalog.skill_level_name("godlike"), "No Skill Level Found.");
        assert_eq!(catalog.county_name("barley"), "Barley Downs");
    }
}
