use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::skill::CharacterSkill;
use crate::stat::BaseStatBlock;

/// Highest level a character record can represent.
pub const MAX_LEVEL: u32 = 14;

/// Hit points gained at each level, keyed by level.
///
/// Serializes as an object with string keys `"1"` through `"14"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HpProgression(BTreeMap<u32, u32>);

impl HpProgression {
    /// A progression with every level from 1 to `max_level` set to 0.
    pub fn empty(max_level: u32) -> Self {
        Self((1..=max_level).map(|level| (level, 0)).collect())
    }

    /// Hit points recorded for a level (0 if unset).
    pub fn get(&self, level: u32) -> u32 {
        self.0.get(&level).copied().unwrap_or(0)
    }

    /// Record hit points for a level.
    pub fn set(&mut self, level: u32, hp: u32) {
        self.0.insert(level, hp);
    }

    /// Sum of hit points over every level, saturating at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.0.values().fold(0, |sum, hp| sum.saturating_add(*hp))
    }

    /// Iterate `(level, hp)` in level order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.0.iter().map(|(l, hp)| (*l, *hp))
    }
}

impl Default for HpProgression {
    fn default() -> Self {
        Self::empty(MAX_LEVEL)
    }
}

/// A player character.
///
/// Field names follow the persisted document layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Record id, assigned by the store.
    #[serde(default)]
    pub id: String,
    /// Name.
    pub name: String,
    /// A defining trait.
    #[serde(rename = "trait", default)]
    pub trait_: String,
    /// Backstory.
    #[serde(default)]
    pub bio: String,
    /// Experience points.
    #[serde(default)]
    pub xp: u32,
    /// Current level.
    pub level: u32,
    /// Class id.
    #[serde(rename = "classId")]
    pub class_id: String,
    /// Owning house id.
    #[serde(rename = "houseId")]
    pub house_id: String,
    /// County id.
    #[serde(rename = "countyId")]
    pub county_id: String,
    /// Current scores, editable after creation.
    pub current_base_stats: BaseStatBlock,
    /// Scores at creation; written once.
    pub original_base_stats: BaseStatBlock,
    /// Hit points per level.
    #[serde(default)]
    pub hp_progression: HpProgression,
    /// Skill ranks held, at most one per skill.
    #[serde(default)]
    pub skills: Vec<CharacterSkill>,
    /// Skills designated as class skills by the player.
    #[serde(rename = "chosenClassSkills", default, skip_serializing_if = "Option::is_none")]
    pub chosen_class_skills: Option<Vec<String>>,
}

impl Character {
    /// The rank id held in a skill.
    pub fn skill_rank(&self, skill_id: &str) -> Option<&str> {
        self.skills
            .iter()
            .find(|s| s.skill_id == skill_id)
            .map(|s| s.skill_level_id.as_str())
    }

    /// Player-designated class skills, or an empty slice.
    pub fn chosen_class_skills(&self) -> &[String] {
        self.chosen_class_skills.as_deref().unwrap_or_default()
    }

    /// Total hit points across all levels.
    pub fn total_hp(&self) -> u32 {
        self.hp_progression.total()
    }
}
