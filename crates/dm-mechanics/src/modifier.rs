//! Ability modifiers.

use dm_core::{BaseStatBlock, Catalog};
use serde::Serialize;

use crate::config::ClassTraits;

/// The standard modifier curve: `floor((score - 10) / 2)`.
pub fn modifier(score: i32) -> i32 {
    score.saturating_sub(10).div_euclid(2)
}

/// The simplified modifier for classes exempt from derived stats: 1 at 12 or
/// above, otherwise 0.
pub fn retainer_modifier(score: i32) -> i32 {
    i32::from(score >= 12)
}

/// The modifier for a score under a class's traits.
pub fn stat_modifier(score: i32, traits: ClassTraits) -> i32 {
    if traits.disables_derived_stats {
        retainer_modifier(score)
    } else {
        modifier(score)
    }
}

/// One row of the modifier table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatModifier {
    /// Stat id.
    pub stat_id: String,
    /// Stat abbreviation.
    pub abbreviation: String,
    /// Current score (0 if the stat block has no such stat).
    pub score: i32,
    /// Modifier for the score.
    pub modifier: i32,
}

/// Every catalog stat with its modifier, in display order.
pub fn modifier_table(catalog: &Catalog, stats: &BaseStatBlock, traits: ClassTraits) -> Vec<StatModifier> {
    catalog
        .stats
        .iter()
        .map(|stat| {
            let score = stats.get_by_id(&stat.id).unwrap_or(0);
            StatModifier {
                stat_id: stat.id.clone(),
                abbreviation: stat.abbreviation.clone(),
                score,
                modifier: stat_modifier(score, traits),
            }
        })
        .collect()
}
