//! Edits to a finalized character.
//!
//! Each operation changes the character in place and returns the document
//! fields it touched, ready for [`dm_core::repo::persist_edit`]: one field
//! becomes a single-field patch, several become a batch patch.

use dm_core::{BaseStatBlock, Catalog, Character, Class, StatKey};
use tracing::debug;

use crate::config::RulesConfig;
use crate::eligibility::is_eligible;
use crate::error::{MechError, MechResult};
use crate::hp::HpProgressionEditor;
use crate::skills::SkillEditor;

/// Document fields touched by an edit.
pub type ChangedFields = Vec<&'static str>;

/// Step-wise editor for current stats.
///
/// Scores step up to the configured maximum and down to the class's
/// prerequisite minimum for the stat (0 without one), so an edit can never
/// make the character ineligible for its own class.
#[derive(Debug, Clone)]
pub struct StatEditor<'a> {
    class: Option<&'a Class>,
    max_stat: i32,
    stats: BaseStatBlock,
}

impl<'a> StatEditor<'a> {
    /// Start editing a stat block under a class.
    pub fn new(stats: BaseStatBlock, class: Option<&'a Class>, config: &RulesConfig) -> Self {
        Self {
            class,
            max_stat: config.max_stat,
            stats,
        }
    }

    /// Start editing a stored character's current stats.
    pub fn for_character(character: &Character, catalog: &'a Catalog, config: &RulesConfig) -> Self {
        Self::new(
            character.current_base_stats,
            catalog.class(&character.class_id),
            config,
        )
    }

    /// Lowest score the editor will step down to.
    pub fn floor(&self, key: StatKey) -> i32 {
        self.class.and_then(|c| c.prerequisite_min(key)).unwrap_or(0)
    }

    /// Returns true if the stat cannot step down any further.
    pub fn is_at_floor(&self, key: StatKey) -> bool {
        self.stats.get(key) <= self.floor(key)
    }

    /// Raise a stat by one, up to the maximum. Returns the new score.
    pub fn increment(&mut self, key: StatKey) -> i32 {
        let score = self.stats.get(key);
        if score < self.max_stat {
            self.stats.set(key, score + 1);
        }
        self.stats.get(key)
    }

    /// Lower a stat by one, down to its floor. Returns the new score.
    pub fn decrement(&mut self, key: StatKey) -> i32 {
        let score = self.stats.get(key);
        if score > self.floor(key) {
            self.stats.set(key, score - 1);
        }
        self.stats.get(key)
    }

    /// The edited stats.
    pub fn stats(&self) -> &BaseStatBlock {
        &self.stats
    }

    /// Finish editing.
    pub fn into_stats(self) -> BaseStatBlock {
        self.stats
    }
}

/// Rename a character.
pub fn rename(character: &mut Character, name: impl Into<String>) -> ChangedFields {
    character.name = name.into();
    vec!["name"]
}

/// Replace the current stats.
pub fn set_stats(character: &mut Character, stats: BaseStatBlock) -> ChangedFields {
    character.current_base_stats = stats;
    vec!["current_base_stats"]
}

/// Change the level.
///
/// Lowering the level clears every skill and designated class skill, since
/// the budget and rank requirements no longer hold.
pub fn change_level(character: &mut Character, level: u32, config: &RulesConfig) -> MechResult<ChangedFields> {
    let max = config.max_creation_level;
    if !(1..=max).contains(&level) {
        return Err(MechError::LevelOutOfRange { level, max });
    }
    let lowered = level < character.level;
    character.level = level;
    if lowered {
        debug!(character = %character.id, level, "level lowered, clearing skills");
        character.skills.clear();
        character.chosen_class_skills = Some(Vec::new());
        Ok(vec!["level", "skills", "chosenClassSkills"])
    } else {
        Ok(vec!["level"])
    }
}

/// Change the class. The new class must be eligible for the current stats.
/// Skills and designated class skills are cleared.
pub fn change_class(character: &mut Character, class_id: &str, catalog: &Catalog) -> MechResult<ChangedFields> {
    if catalog.class(class_id).is_none() {
        return Err(MechError::UnknownClass(class_id.to_string()));
    }
    if !is_eligible(&character.current_base_stats, &catalog.classes, class_id) {
        return Err(MechError::IneligibleClass(class_id.to_string()));
    }
    character.class_id = class_id.to_string();
    character.skills.clear();
    character.chosen_class_skills = Some(Vec::new());
    Ok(vec!["classId", "skills", "chosenClassSkills"])
}

/// Change the county.
pub fn change_county(character: &mut Character, county_id: &str, catalog: &Catalog) -> MechResult<ChangedFields> {
    if catalog.county(county_id).is_none() {
        return Err(MechError::UnknownCounty(county_id.to_string()));
    }
    character.county_id = county_id.to_string();
    Ok(vec!["countyId"])
}

/// Keep the result of a hit-point editing session.
pub fn set_hp(character: &mut Character, editor: HpProgressionEditor) -> ChangedFields {
    character.hp_progression = editor.into_progression();
    vec!["hp_progression"]
}

/// Keep the result of a skill editing session.
pub fn set_skills(character: &mut Character, editor: SkillEditor<'_>) -> ChangedFields {
    let (skills, chosen) = editor.into_parts();
    character.skills = skills;
    character.chosen_class_skills = Some(chosen);
    vec!["skills", "chosenClassSkills"]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use dm_core::repo::{self, CHARACTERS};
    use dm_core::{CharacterSkill, MemoryStore, RecordStore};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn stat_editor_respects_prerequisite_floor() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let character = testing::character("warrior", 1, [10, 10, 10, 10, 10, 10]);
        let mut editor = StatEditor::for_character(&character, &catalog, &config);
        assert_eq!(editor.floor(StatKey::Constitution), 9);
        assert_eq!(editor.decrement(StatKey::Constitution), 9);
        assert!(editor.is_at_floor(StatKey::Constitution));
        assert_eq!(editor.decrement(StatKey::Constitution), 9);
        assert_eq!(editor.floor(StatKey::Strength), 0);
    }

    #[test]
    fn stat_editor_caps_at_max() {
        let config = RulesConfig::default();
        let mut editor = StatEditor::new(testing::stats([23, 0, 10, 10, 10, 10]), None, &config);
        assert_eq!(editor.increment(StatKey::Strength), 24);
        assert_eq!(editor.increment(StatKey::Strength), 24);
        assert_eq!(editor.decrement(StatKey::Constitution), 0);
        assert_eq!(editor.into_stats().strength, 24);
    }

    #[test]
    fn lowering_level_clears_skills() {
        let config = RulesConfig::default();
        let mut character = testing::character("warrior", 3, [10; 6]);
        character.skills.push(CharacterSkill::new("stealth", "trained"));

        assert_eq!(change_level(&mut character, 4, &config).unwrap(), vec!["level"]);
        assert_eq!(character.skills.len(), 1);

        let fields = change_level(&mut character, 2, &config).unwrap();
        assert_eq!(fields, vec!["level", "skills", "chosenClassSkills"]);
        assert!(character.skills.is_empty());
        assert_eq!(character.level, 2);

        assert!(matches!(
            change_level(&mut character, 9, &config),
            Err(MechError::LevelOutOfRange { .. })
        ));
    }

    #[test]
    fn class_change_requires_eligibility() {
        let catalog = testing::catalog();
        let mut character = testing::character("warrior", 1, [10, 10, 10, 10, 10, 10]);
        character.skills.push(CharacterSkill::new("stealth", "skilled"));
        assert!(matches!(
            change_class(&mut character, "bard", &catalog),
            Err(MechError::IneligibleClass(_))
        ));
        assert_eq!(character.skills.len(), 1);

        let fields = change_class(&mut character, "retainer", &catalog).unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(character.class_id, "retainer");
        assert!(character.skills.is_empty());
    }

    #[test]
    fn county_change_is_single_field() {
        let catalog = testing::catalog();
        let mut character = testing::character("warrior", 1, [10; 6]);
        assert_eq!(change_county(&mut character, "thornwood", &catalog).unwrap(), vec!["countyId"]);
        assert!(change_county(&mut character, "atlantis", &catalog).is_err());
        assert_eq!(character.county_id, "thornwood");
    }

    #[test]
    fn edits_persist_through_store() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let mut store = MemoryStore::new();
        let mut character =
            repo::create_character(&mut store, &testing::character("warrior", 2, [10, 12, 10, 10, 10, 10])).unwrap();

        let mut hp = HpProgressionEditor::for_character(&character, &catalog, &config);
        hp.roll_missing(&mut StdRng::seed_from_u64(9)).unwrap();
        let fields = set_hp(&mut character, hp);
        repo::persist_edit(&mut store, &character, &fields).unwrap();

        let mut skills = SkillEditor::for_character(&character, &catalog, &config).unwrap();
        assert!(skills.select("stealth", "skilled"));
        let fields = set_skills(&mut character, skills);
        repo::persist_edit(&mut store, &character, &fields).unwrap();

        let fields = change_level(&mut character, 1, &config).unwrap();
        repo::persist_edit(&mut store, &character, &fields).unwrap();

        let stored = repo::fetch_character(&store, &character.id).unwrap();
        assert_eq!(stored.level, 1);
        assert!(stored.skills.is_empty());
        assert!(stored.total_hp() > 0);
        assert_eq!(stored.hp_progression, character.hp_progression);
        assert!(store.get(CHARACTERS, &character.id).unwrap().is_some());
    }
}
