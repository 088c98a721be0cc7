//! Core types for Dice Mice: the reference catalog, characters, houses,
//! and the record store they persist to.
//!
//! This crate holds data only. The rules that derive values from it
//! (modifiers, eligibility, derived stats, hit points, skill budgets) live
//! in `dm-mechanics`.

/// The loaded reference catalog with lookup helpers.
pub mod catalog;
/// Player characters ("mice") and their hit-point progression.
pub mod character;
/// Character classes, prerequisites, and per-level base values.
pub mod class;
/// Counties (character origins).
pub mod county;
/// Derived-stat definitions and class overrides.
pub mod derived;
/// Error types used throughout the crate.
pub mod error;
/// Player houses.
pub mod house;
/// The initiative chart.
pub mod initiative;
/// Typed access to characters and houses in a record store.
pub mod repo;
/// Skills and skill ranks.
pub mod skill;
/// Ability stats and stat blocks.
pub mod stat;
/// Generic document store keyed by record id.
pub mod store;

pub use catalog::Catalog;
pub use character::{Character, HpProgression};
pub use class::{Ability, BaseValue, Class, Prerequisite, WillpowerAdvancement};
pub use county::County;
pub use derived::{DerivedStat, DerivedStatKind, StatOverride};
pub use error::{CoreError, CoreResult};
pub use house::{HouseDraft, PlayerHouse};
pub use initiative::{InitiativeChart, InitiativeEntry};
pub use skill::{CharacterSkill, Skill, SkillLevel};
pub use stat::{BaseStatBlock, Stat, StatKey};
pub use store::{JsonDirStore, MemoryStore, RecordStore};
