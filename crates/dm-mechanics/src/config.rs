//! House rules that vary between tables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// How the `each_level` willpower advancement scales with level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WillpowerEachLevel {
    /// Bonus of `level - 1`, so nothing at level 1.
    #[default]
    LevelMinusOne,
    /// Bonus of `level`.
    Level,
}

/// Rules configuration.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Classes that skip derived-stat math entirely and use the simplified modifier.
    pub derived_stat_exempt_classes: Vec<String>,
    /// Classes whose class skills are designated by the player.
    pub chosen_class_skill_classes: Vec<String>,
    /// Level at which a class's fixed skills start at a free rank.
    pub free_class_skill_level: u32,
    /// Rank granted for free.
    pub skilled_rank_id: String,
    /// Rank never offered for selection.
    pub untrained_rank_id: String,
    /// Highest level selectable when creating or editing a character.
    pub max_creation_level: u32,
    /// Highest level a character can represent.
    pub max_level: u32,
    /// Lowest score any stat may have on a finalized character.
    pub min_finalized_stat: i32,
    /// Ceiling for the stat editor.
    pub max_stat: i32,
    /// Scaling for `each_level` willpower.
    pub willpower_each_level: WillpowerEachLevel,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            derived_stat_exempt_classes: vec!["retainer".to_string()],
            chosen_class_skill_classes: vec!["bard".to_string()],
            free_class_skill_level: 7,
            skilled_rank_id: "skilled".to_string(),
            untrained_rank_id: "untrained".to_string(),
            max_creation_level: 7,
            max_level: dm_core::character::MAX_LEVEL,
            min_finalized_stat: 3,
            max_stat: 24,
            willpower_each_level: WillpowerEachLevel::LevelMinusOne,
        }
    }
}

/// Capabilities of one class under a [`RulesConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassTraits {
    /// Derived, offensive, willpower, and HP values are all zero.
    pub disables_derived_stats: bool,
    /// Class skills are designated by the player rather than fixed.
    pub chosen_class_skills: bool,
}

impl RulesConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> MechResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(dm_core::CoreError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a config file.
    pub fn from_path(path: &Path) -> MechResult<Self> {
        let json = std::fs::read_to_string(path).map_err(dm_core::CoreError::from)?;
        Self::from_json(&json)
    }

    /// Check that the limits are consistent with each other.
    pub fn validate(&self) -> MechResult<()> {
        if self.max_creation_level == 0 {
            return Err(MechError::InvalidConfig(
                "max_creation_level must be at least 1".to_string(),
            ));
        }
        if self.max_creation_level > self.max_level {
            return Err(MechError::InvalidConfig(format!(
                "max_creation_level ({}) exceeds max_level ({})",
                self.max_creation_level, self.max_level
            )));
        }
        if self.min_finalized_stat > self.max_stat {
            return Err(MechError::InvalidConfig(format!(
                "min_finalized_stat ({}) exceeds max_stat ({})",
                self.min_finalized_stat, self.max_stat
            )));
        }
        Ok(())
    }

    /// The traits of a class.
    pub fn traits(&self, class_id: &str) -> ClassTraits {
        ClassTraits {
            disables_derived_stats: self.derived_stat_exempt_classes.iter().any(|c| c == class_id),
            chosen_class_skills: self.chosen_class_skill_classes.iter().any(|c| c == class_id),
        }
    }

    /// Mark a class as exempt from derived-stat math.
    pub fn with_exempt_class(mut self, class_id: impl Into<String>) -> Self {
        self.derived_stat_exempt_classes.push(class_id.into());
        self
    }

    /// Mark a class as having player-designated class skills.
    pub fn with_chosen_class_skill_class(mut self, class_id: impl Into<String>) -> Self {
        self.chosen_class_skill_classes.push(class_id.into());
        self
    }

    /// Set the level at which fixed class skills become free.
    pub fn with_free_class_skill_level(mut self, level: u32) -> Self {
        self.free_class_skill_level = level;
        self
    }

    /// Set the highest level selectable at creation (clamped to 1..=max_level).
    pub fn with_max_creation_level(mut self, level: u32) -> Self {
        self.max_creation_level = level.clamp(1, self.max_level);
        self
    }

    /// Set the `each_level` willpower scaling.
    pub fn with_willpower_each_level(mut self, scaling: WillpowerEachLevel) -> Self {
        self.willpower_each_level = scaling;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = RulesConfig::default();
        assert_eq!(cfg.max_creation_level, 7);
        assert_eq!(cfg.max_level, 14);
        assert_eq!(cfg.willpower_each_level, WillpowerEachLevel::LevelMinusOne);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn traits_come_from_config() {
        let cfg = RulesConfig::default();
        assert!(cfg.traits("retainer").disables_derived_stats);
        assert!(!cfg.traits("retainer").chosen_class_skills);
        assert!(cfg.traits("bard").chosen_class_skills);
        assert_eq!(cfg.traits("warrior"), ClassTraits::default());

        let cfg = cfg.with_exempt_class("squire");
        assert!(cfg.traits("squire").disables_derived_stats);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = RulesConfig::from_json(r#"{"willpower_each_level": "level", "max_stat": 20}"#).unwrap();
        assert_eq!(cfg.willpower_each_level, WillpowerEachLevel::Level);
        assert_eq!(cfg.max_stat, 20);
        assert_eq!(cfg.skilled_rank_id, "skilled");
    }

    #[test]
    fn inconsistent_limits_rejected() {
        assert!(matches!(
            RulesConfig::from_json(r#"{"max_creation_level": 20}"#),
            Err(MechError::InvalidConfig(_))
        ));
        assert!(matches!(
            RulesConfig::from_json(r#"{"min_finalized_stat": 30}"#),
            Err(MechError::InvalidConfig(_))
        ));
    }

    #[test]
    fn builder_clamps_creation_level() {
        let cfg = RulesConfig::default().with_max_creation_level(99);
        assert_eq!(cfg.max_creation_level, 14);
        let cfg = RulesConfig::default().with_max_creation_level(0);
        assert_eq!(cfg.max_creation_level, 1);
    }
}
