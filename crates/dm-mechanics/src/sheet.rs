//! The computed character sheet.
//!
//! A sheet is everything shown for a stored character, derived from the
//! record, the catalog, and the rules config. Nothing on it is stored.

use dm_core::{Catalog, Character};
use serde::Serialize;
use tracing::warn;

use crate::config::RulesConfig;
use crate::derived::{self, DefenseValue, DerivedStats, OffenseValue};
use crate::error::MechResult;
use crate::hp::EXEMPT_HIT_DIE;
use crate::modifier::{StatModifier, modifier_table};
use crate::skills::skill_total;

/// One skill on the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillLine {
    /// Skill id.
    pub skill_id: String,
    /// Skill name.
    pub name: String,
    /// Rank id held.
    pub rank_id: String,
    /// Rank name.
    pub rank: String,
    /// Associated stat abbreviation.
    pub stat: String,
    /// Rank bonus plus stat modifier.
    pub total: i32,
    /// The skill is a class skill for this character.
    pub class_skill: bool,
}

/// A character's full sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterSheet {
    /// Record id.
    pub id: String,
    /// Name.
    pub name: String,
    /// Defining trait.
    #[serde(rename = "trait")]
    pub trait_: String,
    /// Backstory.
    pub bio: String,
    /// Experience points.
    pub xp: u32,
    /// Level.
    pub level: u32,
    /// County name.
    pub county: String,
    /// Class name.
    pub class: String,
    /// Stats and modifiers in display order.
    pub modifiers: Vec<StatModifier>,
    /// Defensive stats.
    pub defense: Vec<DefenseValue>,
    /// Willpower.
    pub willpower: i32,
    /// Offensive stats.
    pub offense: Vec<OffenseValue>,
    /// Initiative dice.
    pub initiative: String,
    /// Hit die, `"N/A"` for exempt classes.
    pub hit_die: String,
    /// Hit points gained at each level up to the current one.
    pub hp_by_level: Vec<(u32, u32)>,
    /// Total hit points.
    pub total_hp: u32,
    /// Selected skills.
    pub skills: Vec<SkillLine>,
}

impl CharacterSheet {
    /// Compute the sheet for a stored character.
    ///
    /// An unknown class yields empty stat tables and a `"__"` hit die rather
    /// than an error. A formula that fails to evaluate is an error.
    pub fn build(character: &Character, catalog: &Catalog, config: &RulesConfig) -> MechResult<Self> {
        let stats = &character.current_base_stats;
        let traits = config.traits(&character.class_id);
        let class = catalog.class(&character.class_id);

        let values = match class {
            Some(class) => derived::compute(catalog, config, class, character.level, stats)?,
            None => {
                warn!(class_id = %character.class_id, "sheet for unknown class");
                DerivedStats {
                    defense: Vec::new(),
                    willpower: derived::base_willpower(stats),
                    offense: Vec::new(),
                    initiative: derived::initiative(&catalog.initiative_chart, stats),
                }
            }
        };

        let hit_die = if traits.disables_derived_stats {
            EXEMPT_HIT_DIE.to_string()
        } else {
            class.map_or_else(|| "__".to_string(), |c| c.hit_die.clone())
        };

        let chosen = character.chosen_class_skills();
        let skills = character
            .skills
            .iter()
            .map(|selected| {
                let skill = catalog.skill(&selected.skill_id);
                let class_skill = if traits.chosen_class_skills {
                    chosen.iter().any(|id| *id == selected.skill_id)
                } else {
                    class.is_some_and(|c| c.has_class_skill(&selected.skill_id))
                };
                SkillLine {
                    skill_id: selected.skill_id.clone(),
                    name: catalog.skill_name(&selected.skill_id),
                    rank_id: selected.skill_level_id.clone(),
                    rank: catalog.skill_level_name(&selected.skill_level_id),
                    stat: skill.map_or_else(
                        || "__".to_string(),
                        |s| catalog.stat_abbreviation(&s.associated_stat_id),
                    ),
                    total: skill.map_or(0, |s| {
                        skill_total(catalog, s, Some(selected.skill_level_id.as_str()), stats)
                    }),
                    class_skill,
                }
            })
            .collect();

        Ok(Self {
            id: character.id.clone(),
            name: character.name.clone(),
            trait_: character.trait_.clone(),
            bio: character.bio.clone(),
            xp: character.xp,
            level: character.level,
            county: catalog.county_name(&character.county_id),
            class: catalog.class_name(&character.class_id),
            modifiers: modifier_table(catalog, stats, traits),
            defense: values.defense,
            willpower: values.willpower,
            offense: values.offense,
            initiative: values.initiative,
            hit_die,
            hp_by_level: character
                .hp_progression
                .iter()
                .filter(|(level, _)| *level <= character.level)
                .collect(),
            total_hp: character.total_hp(),
            skills,
        })
    }
}
