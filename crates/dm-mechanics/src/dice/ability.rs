//! Ability score rolls.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pool::DicePool;
use super::roll::RollResult;
use super::Die;

/// How an ability score is rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityRollMethod {
    /// 3d6.
    #[default]
    Standard,
    /// 4d6, drop the lowest. Used for the county's associated stat.
    Preferred,
}

impl AbilityRollMethod {
    /// Roll with this method, keeping the individual dice.
    pub fn roll<R: Rng>(self, rng: &mut R) -> RollResult {
        match self {
            Self::Standard => DicePool::new().add(Die::D6, 3).roll(rng),
            Self::Preferred => DicePool::new().add(Die::D6, 4).roll(rng).drop_lowest(),
        }
    }

    /// The method for a stat, given whether it is the county's associated stat.
    pub fn for_stat(is_associated: bool) -> Self {
        if is_associated { Self::Preferred } else { Self::Standard }
    }
}

/// Sum of 3d6, in 3..=18.
pub fn roll_ability_score<R: Rng>(rng: &mut R) -> i32 {
    AbilityRollMethod::Standard.roll(rng).total() as i32
}

/// Sum of the best three of 4d6, in 3..=18.
pub fn roll_ability_score_preferred<R: Rng>(rng: &mut R) -> i32 {
    AbilityRollMethod::Preferred.roll(rng).total() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    proptest! {
        #[test]
        fn standard_in_range(seed in any::<u64>()) {
            let score = roll_ability_score(&mut StdRng::seed_from_u64(seed));
            prop_assert!((3..=18).contains(&score));
        }

        #[test]
        fn preferred_in_range(seed in any::<u64>()) {
            let roll = AbilityRollMethod::Preferred.roll(&mut StdRng::seed_from_u64(seed));
            prop_assert_eq!(roll.count(), 3);
            prop_assert_eq!(roll.dropped.len(), 1);
            prop_assert!(roll.dice.iter().all(|d| d.value >= roll.dropped[0].value));
            prop_assert!((3..=18).contains(&(roll.total() as i32)));
        }
    }

    #[test]
    fn preferred_mean_is_higher() {
        let mut rng = StdRng::seed_from_u64(7);
        let samples = 20_000;
        let standard: i64 = (0..samples).map(|_| i64::from(roll_ability_score(&mut rng))).sum();
        let preferred: i64 = (0..samples)
            .map(|_| i64::from(roll_ability_score_preferred(&mut rng)))
            .sum();
        // Expected means are 10.5 and about 12.24.
        let standard_mean = standard as f64 / samples as f64;
        let preferred_mean = preferred as f64 / samples as f64;
        assert!((standard_mean - 10.5).abs() < 0.2);
        assert!(preferred_mean > standard_mean + 1.0);
    }

    #[test]
    fn method_for_stat() {
        assert_eq!(AbilityRollMethod::for_stat(true), AbilityRollMethod::Preferred);
        assert_eq!(AbilityRollMethod::for_stat(false), AbilityRollMethod::Standard);
    }
}
