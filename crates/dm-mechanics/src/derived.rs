//! Derived stats: defensive formulas, offensive base values, willpower, and
//! initiative.
//!
//! Formula variables follow a naming convention: `base` reads the class's
//! base value for the stat at the character's level, and `<abbr>_mod` reads
//! the modifier of the stat with that abbreviation. Names that resolve to
//! neither read as 0.

use std::collections::BTreeMap;

use dm_core::derived::BASE_VARIABLE;
use dm_core::{
    BaseStatBlock, BaseValue, Catalog, Class, DerivedStat, DerivedStatKind, InitiativeChart, StatKey,
    StatOverride, WillpowerAdvancement,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{RulesConfig, WillpowerEachLevel};
use crate::error::{MechError, MechResult};
use crate::formula::Formula;
use crate::modifier::modifier;

/// Initiative shown when the chart has no row for the modifier.
pub const UNKNOWN_INITIATIVE: &str = "Unknown";

/// The first override that applies to this class at this level.
///
/// An override applies when its class matches, the level is at least its
/// minimum, and the class has a feature with the override's ability name.
pub fn resolve_override<'a>(stat: &'a DerivedStat, class: &Class, level: u32) -> Option<&'a StatOverride> {
    stat.overrides().iter().find(|o| {
        o.class_id == class.id && level >= o.min_level && class.has_ability(&o.ability_name)
    })
}

/// The formula and variable list in effect after applying any override.
pub fn effective_formula<'a>(stat: &'a DerivedStat, class: &Class, level: u32) -> (&'a str, &'a [String]) {
    let mut formula = stat.formula.as_str();
    let mut variables = stat.variables.as_slice();
    if let Some(o) = resolve_override(stat, class, level) {
        debug!(stat = %stat.id, class = %class.id, ability = %o.ability_name, "formula override applies");
        if let Some(f) = &o.new_formula {
            formula = f;
        }
        if let Some(v) = &o.new_variables {
            variables = v;
        }
    }
    (formula, variables)
}

/// The stat a `<abbr>_mod` variable refers to.
pub fn variable_stat(catalog: &Catalog, variable: &str) -> Option<StatKey> {
    let abbreviation = variable.strip_suffix("_mod").unwrap_or(variable);
    catalog
        .stat_by_abbreviation(abbreviation)
        .and_then(|stat| stat.key())
}

/// Bind one formula variable.
fn variable_value(
    catalog: &Catalog,
    stat: &DerivedStat,
    class: &Class,
    level: u32,
    stats: &BaseStatBlock,
    variable: &str,
) -> f64 {
    if variable == BASE_VARIABLE {
        return class
            .base_value(level, &stat.id)
            .map_or(0.0, BaseValue::as_number);
    }
    match variable_stat(catalog, variable) {
        Some(key) => f64::from(modifier(stats.get(key))),
        None => {
            warn!(stat = %stat.id, variable, "formula variable matches no stat, using 0");
            0.0
        }
    }
}

/// Evaluate a formula-driven derived stat.
///
/// Returns `None` when the stat does not apply to the class, and 0 when the
/// class has no base-value table at all.
pub fn derived_stat_value(
    catalog: &Catalog,
    stat: &DerivedStat,
    class: &Class,
    level: u32,
    stats: &BaseStatBlock,
) -> MechResult<Option<f64>> {
    if !stat.applies_to(&class.id) {
        return Ok(None);
    }
    if class.base_values.is_empty() {
        return Ok(Some(0.0));
    }

    let (source, variables) = effective_formula(stat, class, level);
    let scope: BTreeMap<String, f64> = variables
        .iter()
        .map(|v| (v.clone(), variable_value(catalog, stat, class, level, stats, v)))
        .collect();

    let formula_error = |source| MechError::Formula {
        stat: stat.id.clone(),
        source,
    };
    let value = Formula::parse(source)
        .map_err(formula_error)?
        .evaluate(&scope)
        .map_err(formula_error)?;
    debug!(stat = %stat.id, formula = source, value, "derived stat evaluated");
    Ok(Some(value))
}

/// The base value of an offensive stat, read directly from the class table.
///
/// Returns `None` when the stat does not apply to the class. Missing
/// entries read as 0.
pub fn non_calculated_value(stat: &DerivedStat, class: &Class, level: u32) -> Option<BaseValue> {
    if !stat.applies_to(&class.id) {
        return None;
    }
    Some(class.base_value(level, &stat.id).cloned().unwrap_or_default())
}

/// Best of the INT, WIS and CHA modifiers.
pub fn base_willpower(stats: &BaseStatBlock) -> i32 {
    [StatKey::Intelligence, StatKey::Wisdom, StatKey::Charisma]
        .into_iter()
        .map(|key| modifier(stats.get(key)))
        .max()
        .unwrap_or(0)
}

/// Willpower after the class's per-level advancement.
pub fn willpower(base: i32, class: &Class, level: u32, config: &RulesConfig) -> i32 {
    let level = i32::try_from(level).unwrap_or(i32::MAX);
    let bonus = match class.willpower_advancement {
        WillpowerAdvancement::None => 0,
        WillpowerAdvancement::EvenLevels => level / 2,
        WillpowerAdvancement::EachLevel => match config.willpower_each_level {
            WillpowerEachLevel::LevelMinusOne => (level - 1).max(0),
            WillpowerEachLevel::Level => level.max(0),
        },
    };
    base + bonus
}

/// Initiative dice for the DEX modifier, such as `"1d6 +2"` or `"1d8"`.
///
/// Returns [`UNKNOWN_INITIATIVE`] when the chart has no row for the
/// modifier.
pub fn initiative(chart: &InitiativeChart, stats: &BaseStatBlock) -> String {
    let dex = modifier(stats.dexterity);
    match chart.entry_for(dex) {
        Some(entry) if dex > 0 => format!("{} +{dex}", entry.dice_rolled),
        Some(entry) if dex < 0 => format!("{} {dex}", entry.dice_rolled),
        Some(entry) => entry.dice_rolled.clone(),
        None => {
            warn!(modifier = dex, "no initiative chart row for modifier");
            UNKNOWN_INITIATIVE.to_string()
        }
    }
}

/// A computed defensive stat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefenseValue {
    /// Derived stat id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Evaluated value.
    pub value: f64,
}

/// A looked-up offensive stat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OffenseValue {
    /// Derived stat id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Base value, which may be a dice expression.
    pub value: BaseValue,
}

/// Every derived value for one class, level, and stat block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedStats {
    /// Defensive stats that apply to the class, in catalog order.
    pub defense: Vec<DefenseValue>,
    /// Willpower.
    pub willpower: i32,
    /// Offensive stats that apply to the class, in catalog order.
    pub offense: Vec<OffenseValue>,
    /// Initiative dice.
    pub initiative: String,
}

/// Compute every derived value.
///
/// Classes exempt from derived stats get 0 everywhere (and `"0"` for
/// initiative) without evaluating anything.
pub fn compute(
    catalog: &Catalog,
    config: &RulesConfig,
    class: &Class,
    level: u32,
    stats: &BaseStatBlock,
) -> MechResult<DerivedStats> {
    let exempt = config.traits(&class.id).disables_derived_stats;

    let mut defense = Vec::new();
    for stat in catalog.derived_stats_of(&DerivedStatKind::Defense) {
        let value = if exempt {
            stat.applies_to(&class.id).then_some(0.0)
        } else {
            derived_stat_value(catalog, stat, class, level, stats)?
        };
        if let Some(value) = value {
            defense.push(DefenseValue {
                id: stat.id.clone(),
                name: stat.name.clone(),
                value,
            });
        }
    }

    let offense = catalog
        .derived_stats_of(&DerivedStatKind::NonCalculated)
        .filter_map(|stat| {
            let value = if exempt {
                stat.applies_to(&class.id).then(BaseValue::default)
            } else {
                non_calculated_value(stat, class, level)
            }?;
            Some(OffenseValue {
                id: stat.id.clone(),
                name: stat.name.clone(),
                value,
            })
        })
        .collect();

    let (willpower, initiative) = if exempt {
        (0, "0".to_string())
    } else {
        (
            willpower(base_willpower(stats), class, level, config),
            initiative(&catalog.initiative_chart, stats),
        )
    };

    Ok(DerivedStats {
        defense,
        willpower,
        offense,
        initiative,
    })
}
