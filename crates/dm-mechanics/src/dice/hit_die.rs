//! Hit-die descriptors of the form `1dN`.

use std::str::FromStr;

use rand::Rng;
use tracing::debug;

use super::Die;
use crate::error::MechError;

/// A single hit die, written `1dN` in class records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HitDie(Die);

impl HitDie {
    /// A hit die with `sides` faces, or `None` for zero.
    pub fn new(sides: u32) -> Option<Self> {
        Die::from_sides(sides).map(Self)
    }

    /// The underlying die.
    pub fn die(self) -> Die {
        self.0
    }

    /// Highest face.
    pub fn max(self) -> u32 {
        self.0.sides()
    }

    /// Roll the die once.
    pub fn roll<R: Rng>(self, rng: &mut R) -> u32 {
        let value = rng.random_range(1..=self.max());
        debug!(die = %self, value, "rolled hit die");
        value
    }

    /// Roll until the result is strictly greater than `floor`.
    ///
    /// A negative floor counts as 0. When the floor already reaches the
    /// highest face the die is not rolled and the highest face is returned.
    pub fn roll_above<R: Rng>(self, floor: i32, rng: &mut R) -> u32 {
        let floor = floor.max(0).unsigned_abs();
        if floor >= self.max() {
            return self.max();
        }
        loop {
            let value = self.roll(rng);
            if value > floor {
                return value;
            }
        }
    }
}

impl FromStr for HitDie {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MechError::InvalidHitDie(s.to_string());
        let sides = s.strip_prefix("1d").ok_or_else(invalid)?;
        if sides.is_empty() || !sides.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let sides: u32 = sides.parse().map_err(|_| invalid())?;
        Self::new(sides).ok_or_else(invalid)
    }
}

impl std::fmt::Display for HitDie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "1{}", self.0)
    }
}

/// Parse a descriptor and roll it once.
pub fn roll_hit_die<R: Rng>(descriptor: &str, rng: &mut R) -> Result<u32, MechError> {
    Ok(descriptor.parse::<HitDie>()?.roll(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn parses_and_displays() {
        let die: HitDie = "1d6".parse().unwrap();
        assert_eq!(die.max(), 6);
        assert_eq!(die.die(), Die::D6);
        assert_eq!(die.to_string(), "1d6");
        assert_eq!("1d1".parse::<HitDie>().unwrap().max(), 1);
        assert_eq!("1d30".parse::<HitDie>().unwrap().to_string(), "1d30");
    }

    #[test]
    fn rejects_malformed_descriptors() {
        for bad in ["", "d6", "2d6", "1d", "1d0", "1d-4", "1d6+1", " 1d6", "1D6", "1dx"] {
            assert!(
                matches!(bad.parse::<HitDie>(), Err(MechError::InvalidHitDie(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    proptest! {
        #[test]
        fn roll_in_range(seed in any::<u64>()) {
            let value = roll_hit_die("1d6", &mut StdRng::seed_from_u64(seed)).unwrap();
            prop_assert!((1..=6).contains(&value));
        }

        #[test]
        fn roll_above_respects_floor(seed in any::<u64>(), floor in -5i32..8) {
            let die = HitDie::new(8).unwrap();
            let value = die.roll_above(floor, &mut StdRng::seed_from_u64(seed));
            prop_assert!((1..=8).contains(&value));
            prop_assert!(value > floor.max(0) as u32 || value == 8);
        }
    }
}
