//! The character creation wizard.
//!
//! A [`CharacterDraft`] walks through county, stats, class, level, hit
//! points, and skills. Each step keeps the later steps consistent: a new
//! county wipes the stats, a stat change drops a class that is no longer
//! eligible, and a new class or level clears the choices that depended on
//! it. [`CharacterDraft::finalize`] reports every missing piece at once.

use dm_core::{BaseStatBlock, Catalog, Character, CharacterSkill, Class, County, HpProgression, StatKey};
use rand::Rng;
use tracing::{debug, info};

use crate::config::RulesConfig;
use crate::dice::AbilityRollMethod;
use crate::eligibility::{eligible_classes, is_eligible};
use crate::error::{MechError, MechResult};
use crate::hp::HpProgressionEditor;
use crate::skills::SkillEditor;

/// Name given to a mouse finalized without one.
pub const FILLER_NAME: &str = "Unnamed Mouse";

/// In-progress character creation.
#[derive(Debug, Clone)]
pub struct CharacterDraft<'a> {
    catalog: &'a Catalog,
    config: &'a RulesConfig,
    name: String,
    trait_: String,
    bio: String,
    county_id: Option<String>,
    class_id: Option<String>,
    level: u32,
    stats: BaseStatBlock,
    hp: HpProgression,
    skills: Vec<CharacterSkill>,
    chosen_class_skills: Vec<String>,
}

impl<'a> CharacterDraft<'a> {
    /// An empty draft at level 1 with every stat at 0.
    pub fn new(catalog: &'a Catalog, config: &'a RulesConfig) -> Self {
        Self {
            catalog,
            config,
            name: String::new(),
            trait_: String::new(),
            bio: String::new(),
            county_id: None,
            class_id: None,
            level: 1,
            stats: BaseStatBlock::default(),
            hp: HpProgression::empty(config.max_level),
            skills: Vec::new(),
            chosen_class_skills: Vec::new(),
        }
    }

    /// Set the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Set the defining trait.
    pub fn set_trait(&mut self, trait_: impl Into<String>) {
        self.trait_ = trait_.into();
    }

    /// Set the backstory.
    pub fn set_bio(&mut self, bio: impl Into<String>) {
        self.bio = bio.into();
    }

    /// Select the county. Choosing a different county resets every stat to 0.
    pub fn select_county(&mut self, county_id: &str) -> MechResult<()> {
        if self.catalog.county(county_id).is_none() {
            return Err(MechError::UnknownCounty(county_id.to_string()));
        }
        if self.county_id.as_deref() == Some(county_id) {
            return Ok(());
        }
        self.county_id = Some(county_id.to_string());
        self.stats = BaseStatBlock::default();
        debug!(county_id, "county selected, stats reset");
        self.refresh_class();
        Ok(())
    }

    /// The selected county.
    pub fn county(&self) -> Option<&'a County> {
        self.county_id.as_deref().and_then(|id| self.catalog.county(id))
    }

    /// The stat the county lets the player roll with the preferred method.
    pub fn associated_stat(&self) -> Option<StatKey> {
        self.county().and_then(County::associated_stat)
    }

    /// The roll method for a stat.
    pub fn roll_method(&self, key: StatKey) -> AbilityRollMethod {
        AbilityRollMethod::for_stat(self.associated_stat() == Some(key))
    }

    /// Roll one stat and store the result.
    pub fn roll_stat<R: Rng>(&mut self, key: StatKey, rng: &mut R) -> i32 {
        let method = self.roll_method(key);
        let roll = method.roll(rng);
        debug!(stat = %key, ?method, %roll, "rolled ability score");
        let score = i32::try_from(roll.total()).unwrap_or(i32::MAX);
        self.stats.set(key, score);
        self.refresh_class();
        score
    }

    /// Roll all six stats.
    pub fn roll_all<R: Rng>(&mut self, rng: &mut R) {
        for key in StatKey::ALL {
            self.roll_stat(key, rng);
        }
    }

    /// Enter a stat by hand. Negative input is stored as 0.
    pub fn set_stat(&mut self, key: StatKey, score: i64) {
        let score = i32::try_from(score.max(0)).unwrap_or(i32::MAX);
        self.stats.set(key, score);
        self.refresh_class();
    }

    /// Replace all six stats.
    pub fn set_stats(&mut self, stats: BaseStatBlock) {
        for (key, score) in stats.iter() {
            self.stats.set(key, score.max(0));
        }
        self.refresh_class();
    }

    /// The current stats.
    pub fn stats(&self) -> &BaseStatBlock {
        &self.stats
    }

    /// Classes the current stats qualify for, in catalog order.
    pub fn eligible_classes(&self) -> Vec<&'a Class> {
        eligible_classes(&self.stats, &self.catalog.classes)
    }

    fn refresh_class(&mut self) {
        let Some(class_id) = self.class_id.as_deref() else {
            return;
        };
        if !is_eligible(&self.stats, &self.catalog.classes, class_id) {
            info!(class_id, "selected class no longer eligible, clearing");
            self.class_id = None;
            self.clear_skills();
        }
    }

    /// Select a class. It must be eligible for the current stats. Any
    /// selected skills are cleared.
    pub fn select_class(&mut self, class_id: &str) -> MechResult<()> {
        if self.catalog.class(class_id).is_none() {
            return Err(MechError::UnknownClass(class_id.to_string()));
        }
        if !is_eligible(&self.stats, &self.catalog.classes, class_id) {
            return Err(MechError::IneligibleClass(class_id.to_string()));
        }
        self.class_id = Some(class_id.to_string());
        self.clear_skills();
        Ok(())
    }

    /// The selected class.
    pub fn class(&self) -> Option<&'a Class> {
        self.class_id.as_deref().and_then(|id| self.catalog.class(id))
    }

    /// Select the starting level. Hit points and skills are cleared.
    pub fn select_level(&mut self, level: u32) -> MechResult<()> {
        let max = self.config.max_creation_level;
        if !(1..=max).contains(&level) {
            return Err(MechError::LevelOutOfRange { level, max });
        }
        self.level = level;
        self.hp = HpProgression::empty(self.config.max_level);
        self.clear_skills();
        Ok(())
    }

    /// The starting level.
    pub fn level(&self) -> u32 {
        self.level
    }

    fn clear_skills(&mut self) {
        self.skills.clear();
        self.chosen_class_skills.clear();
    }

    /// Edit hit points through an [`HpProgressionEditor`] bound to the
    /// draft's class, level, and constitution.
    pub fn edit_hp<T>(&mut self, edit: impl FnOnce(&mut HpProgressionEditor) -> MechResult<T>) -> MechResult<T> {
        let locked = self
            .class_id
            .as_deref()
            .is_some_and(|id| self.config.traits(id).disables_derived_stats);
        let mut editor = HpProgressionEditor::new(
            std::mem::take(&mut self.hp),
            self.level,
            self.class_id.clone().unwrap_or_default(),
            self.class().map(|c| c.hit_die.clone()),
            self.stats.constitution,
            locked,
        );
        let result = edit(&mut editor);
        self.hp = editor.into_progression();
        result
    }

    /// Enter hit points for a level by hand.
    pub fn set_hp(&mut self, level: u32, hp: i64) -> MechResult<()> {
        self.edit_hp(|editor| editor.set(level, hp))
    }

    /// Roll hit points for a level.
    pub fn roll_hp<R: Rng>(&mut self, level: u32, rng: &mut R) -> MechResult<u32> {
        self.edit_hp(|editor| editor.roll(level, rng))
    }

    /// The hit-point progression.
    pub fn hp(&self) -> &HpProgression {
        &self.hp
    }

    /// A skill editor for the selected class and level.
    pub fn skill_editor(&self) -> MechResult<SkillEditor<'a>> {
        let class = self.class().ok_or(MechError::NoClassSelected)?;
        Ok(SkillEditor::new(
            self.catalog,
            self.config,
            class,
            self.level,
            self.skills.clone(),
            self.chosen_class_skills.clone(),
        ))
    }

    /// Keep the result of a skill editing session.
    pub fn apply_skills(&mut self, editor: SkillEditor<'_>) {
        let (skills, chosen) = editor.into_parts();
        self.skills = skills;
        self.chosen_class_skills = chosen;
    }

    /// The selected skills.
    pub fn skills(&self) -> &[CharacterSkill] {
        &self.skills
    }

    /// Every reason the draft cannot be finalized yet.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let class = self.class();
        if class.is_none() {
            errors.push("Please Select A Class".to_string());
        }
        let exempt = class.is_some_and(|c| self.config.traits(&c.id).disables_derived_stats);
        if !exempt && self.hp.get(self.level) == 0 {
            errors.push(format!("Please Set HP for Level {}", self.level));
        }
        if self.county().is_none() {
            errors.push("Please Select A County".to_string());
        }
        if !self.stats.all_at_least(self.config.min_finalized_stat) {
            errors.push(format!(
                "All Base Stats must have a value >= {}",
                self.config.min_finalized_stat
            ));
        }
        errors
    }

    /// Build the character for a house, or return every validation message.
    ///
    /// The original stats are recorded only for characters created at
    /// level 1; higher-level characters start with all zeros there.
    pub fn finalize(self, house_id: impl Into<String>) -> Result<Character, Vec<String>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        let name = match self.name.trim() {
            "" => FILLER_NAME.to_string(),
            name => name.to_string(),
        };
        let original_base_stats = if self.level == 1 {
            self.stats
        } else {
            BaseStatBlock::default()
        };
        let chosen_class_skills = (!self.chosen_class_skills.is_empty()).then_some(self.chosen_class_skills);
        Ok(Character {
            id: String::new(),
            name,
            trait_: self.trait_,
            bio: self.bio,
            xp: 0,
            level: self.level,
            class_id: self.class_id.unwrap_or_default(),
            house_id: house_id.into(),
            county_id: self.county_id.unwrap_or_default(),
            current_base_stats: self.stats,
            original_base_stats,
            hp_progression: self.hp,
            skills: self.skills,
            chosen_class_skills,
        })
    }
}
