//! Error types for the rules engine.

use crate::formula::FormulaError;

/// Errors that can occur while applying the rules.
///
/// These indicate malformed reference data or misuse of an editor. Budget
/// and eligibility limits are never errors; they show up as `false` from the
/// `can_*` checks instead.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A hit-die descriptor is not of the form `1dN`.
    #[error("invalid hit die: {0:?}")]
    InvalidHitDie(String),

    /// A derived-stat formula failed to parse or evaluate.
    #[error("formula for '{stat}' failed: {source}")]
    Formula {
        /// Id of the derived stat whose formula failed.
        stat: String,
        /// The underlying formula error.
        #[source]
        source: FormulaError,
    },

    /// A class id does not exist in the catalog.
    #[error("unknown class: {0}")]
    UnknownClass(String),

    /// A county id does not exist in the catalog.
    #[error("unknown county: {0}")]
    UnknownCounty(String),

    /// The operation needs a class and none is selected.
    #[error("no class selected")]
    NoClassSelected,

    /// A level is outside the range the operation accepts.
    #[error("level {level} is out of range (1..={max})")]
    LevelOutOfRange {
        /// The rejected level.
        level: u32,
        /// Highest accepted level.
        max: u32,
    },

    /// Hit points were edited for a level the character has not reached.
    #[error("level {level} is locked (character is level {current})")]
    LevelLocked {
        /// The locked level.
        level: u32,
        /// The character's current level.
        current: u32,
    },

    /// A class was selected whose prerequisites the stats do not meet.
    #[error("class '{0}' is not eligible for these stats")]
    IneligibleClass(String),

    /// The rules configuration is malformed.
    #[error("invalid rules config: {0}")]
    InvalidConfig(String),

    /// An error from the data layer.
    #[error(transparent)]
    Core(#[from] dm_core::CoreError),
}

/// Convenience result type for rules operations.
pub type MechResult<T> = Result<T, MechError>;
