//! Dice types, pools, and the roll primitives the rules use.
//!
//! Every roll takes the RNG explicitly so callers can seed it; pass
//! `&mut rand::rng()` for an unseeded roll.

pub mod ability;
pub mod hit_die;
pub mod pool;
pub mod roll;

pub use ability::{AbilityRollMethod, roll_ability_score, roll_ability_score_preferred};
pub use hit_die::{HitDie, roll_hit_die};
pub use pool::DicePool;
pub use roll::{DieResult, RollResult};

use serde::{Deserialize, Serialize};

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// A die with any other positive number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::Custom(n) => n,
        }
    }

    /// The die with `sides` faces, or `None` for zero.
    pub fn from_sides(sides: u32) -> Option<Self> {
        match sides {
            0 => None,
            4 => Some(Self::D4),
            6 => Some(Self::D6),
            8 => Some(Self::D8),
            10 => Some(Self::D10),
            12 => Some(Self::D12),
            20 => Some(Self::D20),
            n => Some(Self::Custom(n)),
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn die_sides() {
        assert_eq!(Die::D4.sides(), 4);
        assert_eq!(Die::D6.sides(), 6);
        assert_eq!(Die::D20.sides(), 20);
        assert_eq!(Die::Custom(3).sides(), 3);
    }

    #[test]
    fn die_from_sides() {
        assert_eq!(Die::from_sides(6), Some(Die::D6));
        assert_eq!(Die::from_sides(1), Some(Die::Custom(1)));
        assert_eq!(Die::from_sides(0), None);
    }

    #[test]
    fn die_display() {
        assert_eq!(Die::D8.to_string(), "d8");
        assert_eq!(Die::Custom(30).to_string(), "d30");
    }
}
