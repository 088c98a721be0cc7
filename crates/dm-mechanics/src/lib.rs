//! Rules engine for Dice Mice.
//!
//! Provides dice rolling, ability modifiers, a small formula language for
//! derived stats, class eligibility, hit-point progression, and skill-point
//! budgets, plus the creation wizard and post-creation edits built on them.
//! Everything here is a pure computation over catalog and character data;
//! persistence goes through `dm_core::store`.

pub mod config;
pub mod derived;
pub mod dice;
pub mod draft;
pub mod edit;
pub mod eligibility;
pub mod error;
pub mod formula;
pub mod hp;
pub mod modifier;
pub mod sheet;
pub mod skills;
pub mod validate;

#[cfg(test)]
mod testing;

pub use config::{ClassTraits, RulesConfig, WillpowerEachLevel};
pub use derived::{DerivedStats, compute as compute_derived_stats};
pub use dice::{AbilityRollMethod, DicePool, Die, DieResult, HitDie, RollResult};
pub use draft::CharacterDraft;
pub use edit::{ChangedFields, StatEditor};
pub use eligibility::{eligible_classes, is_eligible};
pub use error::{MechError, MechResult};
pub use formula::{Formula, FormulaError};
pub use hp::{HpProgressionEditor, roll_level_hp};
pub use modifier::{modifier, retainer_modifier};
pub use sheet::CharacterSheet;
pub use skills::{SkillEditor, skill_ranks_available};
pub use validate::{ValidationIssue, validate_catalog};
