use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One of the six ability stats every character carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKey {
    /// Strength (STR).
    Strength,
    /// Constitution (CON).
    Constitution,
    /// Dexterity (DEX).
    Dexterity,
    /// Intelligence (INT).
    Intelligence,
    /// Wisdom (WIS).
    Wisdom,
    /// Charisma (CHA).
    Charisma,
}

impl StatKey {
    /// All six keys in stat-block order.
    pub const ALL: [StatKey; 6] = [
        StatKey::Strength,
        StatKey::Constitution,
        StatKey::Dexterity,
        StatKey::Intelligence,
        StatKey::Wisdom,
        StatKey::Charisma,
    ];

    /// The record id used for this stat in reference data and documents.
    pub fn id(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Constitution => "constitution",
            Self::Dexterity => "dexterity",
            Self::Intelligence => "intelligence",
            Self::Wisdom => "wisdom",
            Self::Charisma => "charisma",
        }
    }

    /// Look up a key by its record id.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for StatKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(&s.trim().to_lowercase()).ok_or_else(|| CoreError::UnknownStat(s.to_string()))
    }
}

/// Reference data describing one ability stat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    /// Record id, matching a [`StatKey`] id.
    pub id: String,
    /// Display name (e.g. "Strength").
    pub name: String,
    /// Flavor text.
    #[serde(default)]
    pub description: String,
    /// Short uppercase form used in formulas (e.g. "STR").
    pub abbreviation: String,
    /// Display order.
    #[serde(default)]
    pub order: u32,
}

impl Stat {
    /// The stat key this record describes, if its id is one of the six.
    pub fn key(&self) -> Option<StatKey> {
        StatKey::from_id(&self.id)
    }
}

/// Scores for all six ability stats.
///
/// The serialized shape is a flat object keyed by stat id, which is the
/// document layout used for `current_base_stats` and `original_base_stats`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BaseStatBlock {
    /// Strength score.
    pub strength: i32,
    /// Constitution score.
    pub constitution: i32,
    /// Dexterity score.
    pub dexterity: i32,
    /// Intelligence score.
    pub intelligence: i32,
    /// Wisdom score.
    pub wisdom: i32,
    /// Charisma score.
    pub charisma: i32,
}

impl BaseStatBlock {
    /// Build a block from scores in [`StatKey::ALL`] order.
    pub fn from_scores(scores: [i32; 6]) -> Self {
        let mut block = Self::default();
        for (key, score) in StatKey::ALL.into_iter().zip(scores) {
            block.set(key, score);
        }
        block
    }

    /// Score for a stat.
    pub fn get(&self, key: StatKey) -> i32 {
        match key {
            StatKey::Strength => self.strength,
            StatKey::Constitution => self.constitution,
            StatKey::Dexterity => self.dexterity,
            StatKey::Intelligence => self.intelligence,
            StatKey::Wisdom => self.wisdom,
            StatKey::Charisma => self.charisma,
        }
    }

    /// Score for a stat given by record id. `None` for ids outside the six.
    pub fn get_by_id(&self, id: &str) -> Option<i32> {
        StatKey::from_id(id).map(|k| self.get(k))
    }

    /// Overwrite the score for a stat.
    pub fn set(&mut self, key: StatKey, score: i32) {
        let slot = match key {
            StatKey::Strength => &mut self.strength,
            StatKey::Constitution => &mut self.constitution,
            StatKey::Dexterity => &mut self.dexterity,
            StatKey::Intelligence => &mut self.intelligence,
            StatKey::Wisdom => &mut self.wisdom,
            StatKey::Charisma => &mut self.charisma,
        };
        *slot = score;
    }

    /// Iterate `(key, score)` pairs in stat-block order.
    pub fn iter(&self) -> impl Iterator<Item = (StatKey, i32)> + '_ {
        StatKey::ALL.into_iter().map(|k| (k, self.get(k)))
    }

    /// Returns true if every score is at least `min`.
    pub fn all_at_least(&self, min: i32) -> bool {
        self.iter().all(|(_, v)| v >= min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ids_round_trip() {
        for key in StatKey::ALL {
            assert_eq!(StatKey::from_id(key.id()), Some(key));
        }
        assert_eq!(StatKey::from_id("luck"), None);
    }

    #[test]
    fn key_from_str_is_case_insensitive() {
        assert_eq!("Dexterity".parse::<StatKey>().unwrap(), StatKey::Dexterity);
        assert!("agility".parse::<StatKey>().is_err());
    }

    #[test]
    fn block_get_set() {
        let mut block = BaseStatBlock::default();
        block.set(StatKey::Wisdom, 14);
        assert_eq!(block.get(StatKey::Wisdom), 14);
        assert_eq!(block.get_by_id("wisdom"), Some(14));
        assert_eq!(block.get_by_id("luck"), None);
    }

    #[test]
    fn block_from_scores_uses_block_order() {
        let block = BaseStatBlock::from_scores([1, 2, 3, 4, 5, 6]);
        assert_eq!(block.strength, 1);
        assert_eq!(block.constitution, 2);
        assert_eq!(block.dexterity, 3);
        assert_eq!(block.charisma, 6);
    }

    #[test]
    fn block_serializes_flat() {
        let block = BaseStatBlock::from_scores([10, 11, 12, 13, 14, 15]);
        let json = serde_json::to_value(block).unwrap();
        assert_eq!(json["dexterity"], 12);
        assert_eq!(json.as_object().unwrap().len(), 6);
    }

    #[test]
    fn all_at_least() {
        let block = BaseStatBlock::from_scores([3, 3, 3, 3, 3, 2]);
        assert!(!block.all_at_least(3));
        assert!(block.all_at_least(2));
    }
}
