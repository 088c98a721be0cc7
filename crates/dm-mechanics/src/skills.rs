//! Skill points and rank selection.
//!
//! A class grants `skill_ranks` points per level. Each selected rank costs
//! its point cost, except that a *free* skill gets its first point waived:
//! player-designated class skills for classes that designate them, and the
//! class's fixed skills once the character reaches the free level.
//!
//! Running out of points or levels is not an error. The editor reports
//! `false` from [`SkillEditor::can_select`] and refuses the change.

use dm_core::class::SKILL_RANKS_KEY;
use dm_core::{BaseStatBlock, Catalog, Character, CharacterSkill, Class, Skill, SkillLevel};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{ClassTraits, RulesConfig};
use crate::error::{MechError, MechResult};
use crate::modifier::modifier;

/// Skill points a class grants at a level (0 if the table has no entry).
pub fn skill_ranks_available(class: &Class, level: u32) -> i32 {
    class
        .base_value(level, SKILL_RANKS_KEY)
        .map(|v| v.as_number() as i32)
        .unwrap_or(0)
}

/// One selectable rank for a skill, as offered to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankOption {
    /// Rank id.
    pub rank_id: String,
    /// Rank name.
    pub name: String,
    /// Point cost of holding the rank.
    pub cost: i32,
    /// Character level needed for this skill at this rank.
    pub required_level: u32,
    /// The skill currently holds this rank.
    pub selected: bool,
    /// The rank can be chosen now.
    pub selectable: bool,
}

/// Editing state for a character's skills.
#[derive(Debug, Clone)]
pub struct SkillEditor<'a> {
    catalog: &'a Catalog,
    config: &'a RulesConfig,
    class: &'a Class,
    traits: ClassTraits,
    level: u32,
    selected: Vec<CharacterSkill>,
    chosen: Vec<String>,
}

impl<'a> SkillEditor<'a> {
    /// Start editing a selection for a class and level.
    pub fn new(
        catalog: &'a Catalog,
        config: &'a RulesConfig,
        class: &'a Class,
        level: u32,
        selected: Vec<CharacterSkill>,
        chosen: Vec<String>,
    ) -> Self {
        Self {
            catalog,
            config,
            class,
            traits: config.traits(&class.id),
            level,
            selected,
            chosen,
        }
    }

    /// Start editing a stored character's skills.
    pub fn for_character(character: &Character, catalog: &'a Catalog, config: &'a RulesConfig) -> MechResult<Self> {
        let class = catalog
            .class(&character.class_id)
            .ok_or_else(|| MechError::UnknownClass(character.class_id.clone()))?;
        Ok(Self::new(
            catalog,
            config,
            class,
            character.level,
            character.skills.clone(),
            character.chosen_class_skills().to_vec(),
        ))
    }

    /// Points the class grants at this level.
    pub fn ranks_available(&self) -> i32 {
        skill_ranks_available(self.class, self.level)
    }

    /// Returns true if the skill is a class skill for this character.
    pub fn is_class_skill(&self, skill_id: &str) -> bool {
        if self.traits.chosen_class_skills {
            self.chosen.iter().any(|id| id == skill_id)
        } else {
            self.class.has_class_skill(skill_id)
        }
    }

    /// Returns true if the skill's first point is waived.
    pub fn is_free(&self, skill_id: &str) -> bool {
        if self.traits.chosen_class_skills {
            self.chosen.iter().any(|id| id == skill_id)
        } else {
            self.level >= self.config.free_class_skill_level && self.class.has_class_skill(skill_id)
        }
    }

    fn rank_cost(&self, rank_id: &str) -> i32 {
        match self.catalog.skill_level(rank_id) {
            Some(rank) => rank.cost,
            None => {
                warn!(rank_id, "unknown skill rank costs nothing");
                0
            }
        }
    }

    /// Points spent on the current selection.
    pub fn used_points(&self) -> i32 {
        self.selected
            .iter()
            .map(|s| {
                let cost = self.rank_cost(&s.skill_level_id);
                if !self.is_free(&s.skill_id) {
                    cost
                } else if cost > 1 {
                    cost - 1
                } else {
                    0
                }
            })
            .sum()
    }

    /// Points left to spend. Negative if the selection is over budget.
    pub fn available_points(&self) -> i32 {
        let available = self.ranks_available() - self.used_points();
        debug!(level = self.level, class = %self.class.id, available, "skill points recalculated");
        available
    }

    /// The rank a skill currently holds.
    pub fn current_rank(&self, skill_id: &str) -> Option<&str> {
        self.selected
            .iter()
            .find(|s| s.skill_id == skill_id)
            .map(|s| s.skill_level_id.as_str())
    }

    fn current_cost(&self, skill_id: &str) -> i32 {
        self.current_rank(skill_id).map_or(0, |rank| self.rank_cost(rank))
    }

    /// Returns true if the skill can be set to this rank now.
    ///
    /// The level must reach the rank's requirement, and the budget must cover
    /// the rank's cost minus what the skill already costs.
    pub fn can_select(&self, skill_id: &str, rank: &SkillLevel) -> bool {
        if rank.id == self.config.untrained_rank_id {
            return false;
        }
        let required = rank.required_level(self.is_class_skill(skill_id));
        self.level >= required && self.available_points() >= rank.cost - self.current_cost(skill_id)
    }

    /// Every rank offered for a skill, in display order.
    pub fn rank_options(&self, skill_id: &str) -> Vec<RankOption> {
        let is_class_skill = self.is_class_skill(skill_id);
        let current = self.current_rank(skill_id);
        self.catalog
            .skill_levels
            .iter()
            .filter(|rank| rank.id != self.config.untrained_rank_id)
            .map(|rank| RankOption {
                rank_id: rank.id.clone(),
                name: rank.name.clone(),
                cost: rank.cost,
                required_level: rank.required_level(is_class_skill),
                selected: current == Some(rank.id.as_str()),
                selectable: self.can_select(skill_id, rank),
            })
            .collect()
    }

    /// Set a skill to a rank. Returns false, leaving the selection alone, if
    /// the skill or rank is unknown or the rank cannot be selected.
    pub fn select(&mut self, skill_id: &str, rank_id: &str) -> bool {
        if self.catalog.skill(skill_id).is_none() {
            warn!(skill_id, "cannot select unknown skill");
            return false;
        }
        let Some(rank) = self.catalog.skill_level(rank_id) else {
            warn!(rank_id, "cannot select unknown skill rank");
            return false;
        };
        if !self.can_select(skill_id, rank) {
            return false;
        }
        match self.selected.iter_mut().find(|s| s.skill_id == skill_id) {
            Some(existing) => existing.skill_level_id = rank.id.clone(),
            None => self.selected.push(CharacterSkill::new(skill_id, rank.id.clone())),
        }
        true
    }

    /// Remove a skill from the selection entirely. Returns false if it was
    /// not selected.
    pub fn deselect(&mut self, skill_id: &str) -> bool {
        let before = self.selected.len();
        self.selected.retain(|s| s.skill_id != skill_id);
        self.selected.len() != before
    }

    /// Add or remove a player-designated class skill.
    ///
    /// Designating a skill grants it the free rank if it has none. Removing
    /// the designation removes the skill from the selection. Designations
    /// are capped at the class's skill ranks for the level. Returns true if
    /// anything changed.
    pub fn toggle_chosen_class_skill(&mut self, skill_id: &str) -> bool {
        if !self.traits.chosen_class_skills {
            return false;
        }
        if self.chosen.iter().any(|id| id == skill_id) {
            self.chosen.retain(|id| id != skill_id);
            self.deselect(skill_id);
            return true;
        }
        let quota = usize::try_from(self.ranks_available()).unwrap_or(0);
        if self.chosen.len() >= quota || self.catalog.skill(skill_id).is_none() {
            return false;
        }
        self.chosen.push(skill_id.to_string());
        self.grant_free_rank(skill_id);
        true
    }

    /// Grant the free rank to every fixed class skill once the character
    /// reaches the free level. Skills that already hold a rank keep it.
    /// Returns the number of skills granted.
    pub fn grant_class_competency(&mut self) -> usize {
        if self.traits.chosen_class_skills || self.level < self.config.free_class_skill_level {
            return 0;
        }
        let class = self.class;
        let granted = class
            .skill_ids
            .iter()
            .filter(|id| self.grant_free_rank(id))
            .count();
        if granted > 0 {
            debug!(class = %class.id, granted, "granted class competency");
        }
        granted
    }

    fn grant_free_rank(&mut self, skill_id: &str) -> bool {
        if self.current_rank(skill_id).is_some() {
            return false;
        }
        if self.catalog.skill_level(&self.config.skilled_rank_id).is_none() {
            warn!(rank_id = %self.config.skilled_rank_id, "free rank missing from catalog");
            return false;
        }
        self.selected
            .push(CharacterSkill::new(skill_id, self.config.skilled_rank_id.clone()));
        true
    }

    /// The skill's total: rank bonus plus the associated stat's modifier, or
    /// 0 if the skill is not selected.
    pub fn total_for_skill(&self, skill: &Skill, stats: &BaseStatBlock) -> i32 {
        skill_total(self.catalog, skill, self.current_rank(&skill.id), stats)
    }

    /// The current selection.
    pub fn skills(&self) -> &[CharacterSkill] {
        &self.selected
    }

    /// The current player-designated class skills.
    pub fn chosen_class_skills(&self) -> &[String] {
        &self.chosen
    }

    /// Finish editing, returning the selection and designated class skills.
    pub fn into_parts(self) -> (Vec<CharacterSkill>, Vec<String>) {
        (self.selected, self.chosen)
    }
}

/// Rank bonus plus associated-stat modifier for a held rank, or 0 for none.
pub fn skill_total(catalog: &Catalog, skill: &Skill, rank_id: Option<&str>, stats: &BaseStatBlock) -> i32 {
    let Some(rank) = rank_id.and_then(|id| catalog.skill_level(id)) else {
        return 0;
    };
    let score = stats.get_by_id(&skill.associated_stat_id).unwrap_or_else(|| {
        warn!(skill = %skill.id, stat = %skill.associated_stat_id, "skill has unknown associated stat");
        0
    });
    rank.bonus + modifier(score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;

    fn editor<'a>(catalog: &'a Catalog, config: &'a RulesConfig, class: &str, level: u32) -> SkillEditor<'a> {
        let class = catalog.class(class).unwrap();
        SkillEditor::new(catalog, config, class, level, Vec::new(), Vec::new())
    }

    #[test]
    fn ranks_come_from_class_table() {
        let catalog = testing::catalog();
        let warrior = catalog.class("warrior").unwrap();
        assert_eq!(skill_ranks_available(warrior, 1), 2);
        assert_eq!(skill_ranks_available(warrior, 3), 4);
        assert_eq!(skill_ranks_available(warrior, 12), 0);
    }

    #[test]
    fn free_skilled_rank_costs_nothing() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let mut skills = editor(&catalog, &config, "warrior", 7);
        assert!(skills.select("lore", "skilled"));
        assert!(skills.select("athletics", "skilled"));
        assert!(skills.is_free("athletics"));
        assert!(!skills.is_free("lore"));
        assert_eq!(skills.used_points(), 1);
        assert_eq!(skills.available_points(), 2);
    }

    #[test]
    fn free_skill_pays_above_first_point() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let mut skills = editor(&catalog, &config, "warrior", 7);
        assert!(skills.select("stealth", "expert"));
        assert_eq!(skills.used_points(), 2);
    }

    #[test]
    fn below_free_level_class_skills_pay_in_full() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let mut skills = editor(&catalog, &config, "warrior", 3);
        assert!(skills.select("stealth", "trained"));
        assert_eq!(skills.used_points(), 2);
    }

    #[test]
    fn required_level_depends_on_class_skill() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let skills = editor(&catalog, &config, "warrior", 3);
        let trained = catalog.skill_level("trained").unwrap();
        assert!(skills.can_select("stealth", trained));
        assert!(!skills.can_select("lore", trained));
    }

    #[test]
    fn budget_gates_selection() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let mut skills = editor(&catalog, &config, "warrior", 1);
        assert!(skills.select("stealth", "skilled"));
        assert!(skills.select("lore", "skilled"));
        assert_eq!(skills.available_points(), 0);

        let skilled = catalog.skill_level("skilled").unwrap();
        assert!(!skills.can_select("charm", skilled));
        assert!(!skills.select("charm", "skilled"));
        // Re-selecting the held rank costs nothing extra.
        assert!(skills.can_select("stealth", skilled));
        assert_eq!(skills.skills().len(), 2);
    }

    #[test]
    fn switching_rank_credits_current_cost() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let mut skills = editor(&catalog, &config, "warrior", 3);
        assert!(skills.select("stealth", "skilled"));
        assert!(skills.select("athletics", "skilled"));
        assert!(skills.select("lore", "skilled"));
        assert_eq!(skills.available_points(), 1);
        assert!(skills.select("stealth", "trained"));
        assert_eq!(skills.current_rank("stealth"), Some("trained"));
        assert_eq!(skills.available_points(), 0);
    }

    #[test]
    fn deselect_removes_skill_entirely() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let mut skills = editor(&catalog, &config, "warrior", 3);
        assert!(skills.select("stealth", "trained"));
        assert!(skills.deselect("stealth"));
        assert_eq!(skills.current_rank("stealth"), None);
        assert!(!skills.deselect("stealth"));
    }

    #[test]
    fn untrained_and_unknown_ranks_rejected() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let mut skills = editor(&catalog, &config, "warrior", 7);
        assert!(!skills.select("stealth", "untrained"));
        assert!(!skills.select("stealth", "godlike"));
        assert!(!skills.select("juggling", "skilled"));
        let options = skills.rank_options("stealth");
        let ids: Vec<_> = options.iter().map(|o| o.rank_id.as_str()).collect();
        assert_eq!(ids, vec!["skilled", "trained", "expert"]);
    }

    #[test]
    fn rank_options_report_state() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let mut skills = editor(&catalog, &config, "warrior", 3);
        assert!(skills.select("lore", "skilled"));
        let options = skills.rank_options("lore");
        assert!(options[0].selected);
        assert_eq!(options[1].required_level, 5);
        assert!(!options[1].selectable);
    }

    #[test]
    fn chosen_class_skills_grant_and_remove() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let mut skills = editor(&catalog, &config, "bard", 1);
        assert!(skills.toggle_chosen_class_skill("lore"));
        assert!(skills.toggle_chosen_class_skill("charm"));
        assert_eq!(skills.current_rank("lore"), Some("skilled"));
        assert_eq!(skills.used_points(), 0);
        assert!(skills.is_class_skill("charm"));

        // Quota is the level's skill ranks.
        assert!(!skills.toggle_chosen_class_skill("stealth"));

        assert!(skills.toggle_chosen_class_skill("lore"));
        assert_eq!(skills.current_rank("lore"), None);
        assert_eq!(skills.chosen_class_skills(), ["charm".to_string()]);
    }

    #[test]
    fn designation_keeps_existing_rank() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let mut skills = editor(&catalog, &config, "bard", 1);
        assert!(skills.select("lore", "skilled"));
        assert!(skills.toggle_chosen_class_skill("lore"));
        assert_eq!(skills.skills().len(), 1);
        assert_eq!(skills.used_points(), 0);
    }

    #[test]
    fn fixed_class_cannot_designate() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let mut skills = editor(&catalog, &config, "warrior", 1);
        assert!(!skills.toggle_chosen_class_skill("lore"));
        assert!(skills.chosen_class_skills().is_empty());
    }

    #[test]
    fn class_competency_is_idempotent() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let class = catalog.class("warrior").unwrap();
        let mut skills = SkillEditor::new(
            &catalog,
            &config,
            class,
            7,
            vec![CharacterSkill::new("stealth", "trained")],
            Vec::new(),
        );
        assert_eq!(skills.grant_class_competency(), 1);
        assert_eq!(skills.grant_class_competency(), 0);
        assert_eq!(skills.current_rank("stealth"), Some("trained"));
        assert_eq!(skills.current_rank("athletics"), Some("skilled"));
        assert_eq!(skills.used_points(), 1);
    }

    #[test]
    fn class_competency_waits_for_free_level() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        assert_eq!(editor(&catalog, &config, "warrior", 6).grant_class_competency(), 0);
        assert_eq!(editor(&catalog, &config, "bard", 7).grant_class_competency(), 0);
    }

    #[test]
    fn totals_add_rank_bonus_and_modifier() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let mut skills = editor(&catalog, &config, "warrior", 1);
        assert!(skills.select("stealth", "skilled"));
        let stats = testing::stats([10, 10, 14, 10, 10, 10]);
        let stealth = catalog.skill("stealth").unwrap();
        let lore = catalog.skill("lore").unwrap();
        assert_eq!(skills.total_for_skill(stealth, &stats), 4);
        assert_eq!(skills.total_for_skill(lore, &stats), 0);
    }

    #[test]
    fn for_character_needs_known_class() {
        let catalog = testing::catalog();
        let config = RulesConfig::default();
        let character: Character = serde_json::from_value(serde_json::json!({
            "name": "Pip", "level": 1, "classId": "ghost", "houseId": "h", "countyId": "barley",
            "current_base_stats": {"strength": 10, "constitution": 10, "dexterity": 10,
                                   "intelligence": 10, "wisdom": 10, "charisma": 10},
            "original_base_stats": {"strength": 10, "constitution": 10, "dexterity": 10,
                                    "intelligence": 10, "wisdom": 10, "charisma": 10}
        }))
        .unwrap();
        assert!(matches!(
            SkillEditor::for_character(&character, &catalog, &config),
            Err(MechError::UnknownClass(_))
        ));
    }
}
