use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stat::{BaseStatBlock, StatKey};

/// Key in a class's per-level base values holding the skill-point budget.
pub const SKILL_RANKS_KEY: &str = "skill_ranks";

/// A per-level base value. Reference data mixes numbers (`2`) and dice
/// strings (`"1d6"`) in the same table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaseValue {
    /// A numeric value.
    Number(f64),
    /// A textual value such as a damage die.
    Text(String),
}

impl BaseValue {
    /// Numeric reading of the value. Text that does not parse as a number,
    /// and non-finite numbers, read as 0.
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(n) if n.is_finite() => *n,
            Self::Number(_) => 0.0,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(0.0),
        }
    }
}

impl Default for BaseValue {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

impl From<f64> for BaseValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl fmt::Display for BaseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Format a number without a trailing `.0` when it is whole.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// How a class gains willpower as it levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WillpowerAdvancement {
    /// No per-level bonus.
    #[default]
    None,
    /// +1 for every two levels.
    EvenLevels,
    /// +1 per level.
    EachLevel,
}

/// A class feature unlocked at a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    /// Feature name; derived-stat overrides match on this.
    pub name: String,
    /// Level at which the feature is gained.
    #[serde(default)]
    pub level: u32,
    /// Rules text.
    #[serde(default)]
    pub description: String,
}

/// A minimum score a character needs in one stat to take a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prerequisite {
    /// Stat id (e.g. "strength").
    pub stat: String,
    /// Minimum score.
    pub min: i32,
}

impl Prerequisite {
    /// Returns true if the block meets this prerequisite. A prerequisite on
    /// an unknown stat can never be met.
    pub fn is_met_by(&self, stats: &BaseStatBlock) -> bool {
        stats.get_by_id(&self.stat).is_some_and(|score| score >= self.min)
    }
}

/// A character class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    /// Record id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the class is offered to players.
    #[serde(rename = "isAvailable", default)]
    pub is_available: bool,
    /// Flavor text.
    #[serde(default)]
    pub description: String,
    /// Class features in level order.
    #[serde(default)]
    pub abilities: Vec<Ability>,
    /// Fixed class-skill ids.
    #[serde(rename = "skillIds", default)]
    pub skill_ids: Vec<String>,
    /// Per-level base values keyed by level, then by field (derived-stat id
    /// or `skill_ranks`).
    #[serde(rename = "baseValues", default)]
    pub base_values: BTreeMap<u32, BTreeMap<String, BaseValue>>,
    /// Stat minimums required to take the class.
    #[serde(default)]
    pub prerequisites: Vec<Prerequisite>,
    /// Willpower progression rule.
    #[serde(default)]
    pub willpower_advancement: WillpowerAdvancement,
    /// Hit-die descriptor, `"1dN"`.
    #[serde(default)]
    pub hit_die: String,
}

impl Class {
    /// The base-value row for a level.
    pub fn level_values(&self, level: u32) -> Option<&BTreeMap<String, BaseValue>> {
        self.base_values.get(&level)
    }

    /// A single base value for a level and field.
    pub fn base_value(&self, level: u32, field: &str) -> Option<&BaseValue> {
        self.level_values(level)?.get(field)
    }

    /// Returns true if the class lists a feature with this exact name.
    pub fn has_ability(&self, name: &str) -> bool {
        self.abilities.iter().any(|a| a.name == name)
    }

    /// Returns true if the skill is one of the class's fixed class skills.
    pub fn has_class_skill(&self, skill_id: &str) -> bool {
        self.skill_ids.iter().any(|id| id == skill_id)
    }

    /// The prerequisite minimum for a stat, if the class has one.
    pub fn prerequisite_min(&self, key: StatKey) -> Option<i32> {
        self.prerequisites
            .iter()
            .find(|p| p.stat == key.id())
            .map(|p| p.min)
    }
}
