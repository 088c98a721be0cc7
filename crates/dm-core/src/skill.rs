use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A skill a mouse can train.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Record id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Rules text.
    #[serde(default)]
    pub description: String,
    /// Stat whose modifier is added to the skill total.
    #[serde(rename = "associatedStatId")]
    pub associated_stat_id: String,
    /// Benefit text keyed by rank tier ("trained", "expert", ...).
    #[serde(default)]
    pub benefits: BTreeMap<String, String>,
}

/// A rank tier of proficiency in a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillLevel {
    /// Record id (e.g. "skilled").
    pub id: String,
    /// Display name.
    pub name: String,
    /// Flat bonus added to the skill total.
    #[serde(default)]
    pub bonus: i32,
    /// Minimum character level when the skill is a class skill.
    #[serde(default)]
    pub class_skill_min_level: u32,
    /// Minimum character level when the skill is not a class skill.
    #[serde(default)]
    pub non_class_skill_min_level: u32,
    /// Display order.
    #[serde(default)]
    pub order: u32,
    /// Skill-point cost of holding this rank.
    #[serde(default)]
    pub cost: i32,
}

impl SkillLevel {
    /// Character level required to take this rank.
    pub fn required_level(&self, is_class_skill: bool) -> u32 {
        if is_class_skill {
            self.class_skill_min_level
        } else {
            self.non_class_skill_min_level
        }
    }
}

/// A character's chosen rank in one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSkill {
    /// The skill.
    #[serde(rename = "skillId")]
    pub skill_id: String,
    /// The rank held.
    #[serde(rename = "skillLevelId")]
    pub skill_level_id: String,
}

impl CharacterSkill {
    /// Pair a skill with a rank.
    pub fn new(skill_id: impl Into<String>, skill_level_id: impl Into<String>) -> Self {
        Self {
            skill_id: skill_id.into(),
            skill_level_id: skill_level_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_level_depends_on_class_skill() {
        let rank = SkillLevel {
            id: "trained".into(),
            name: "Trained".into(),
            bonus: 4,
            class_skill_min_level: 3,
            non_class_skill_min_level: 5,
            order: 2,
            cost: 2,
        };
        assert_eq!(rank.required_level(true), 3);
        assert_eq!(rank.required_level(false), 5);
    }

    #[test]
    fn character_skill_document_shape() {
        let json = serde_json::to_value(CharacterSkill::new("stealth", "skilled")).unwrap();
        assert_eq!(json["skillId"], "stealth");
        assert_eq!(json["skillLevelId"], "skilled");
    }
}
