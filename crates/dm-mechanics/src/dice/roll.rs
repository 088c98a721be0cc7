//! Dice roll results.

use serde::{Deserialize, Serialize};

use super::Die;

/// The result of rolling a single die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DieResult {
    /// The type of die that was rolled.
    pub die: Die,
    /// The value rolled (1 to die.sides()).
    pub value: u32,
}

/// The result of rolling a dice pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Dice that count toward the total.
    pub dice: Vec<DieResult>,
    /// Dice rolled but discarded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropped: Vec<DieResult>,
}

impl RollResult {
    /// Sum of the kept dice.
    pub fn total(&self) -> u32 {
        self.dice.iter().map(|d| d.value).sum()
    }

    /// The lowest kept value, or 0 if empty.
    pub fn lowest(&self) -> u32 {
        self.dice.iter().map(|d| d.value).min().unwrap_or(0)
    }

    /// Move the single lowest kept die to `dropped`. Ties drop the first.
    pub fn drop_lowest(mut self) -> Self {
        let lowest = self
            .dice
            .iter()
            .enumerate()
            .min_by_key(|(i, d)| (d.value, *i))
            .map(|(i, _)| i);
        if let Some(i) = lowest {
            let die = self.dice.remove(i);
            self.dropped.push(die);
        }
        self
    }

    /// Number of kept dice.
    pub fn count(&self) -> usize {
        self.dice.len()
    }
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.dice.iter().map(|d| d.value.to_string()).collect();
        write!(f, "[{}]", values.join(", "))?;
        if !self.dropped.is_empty() {
            let dropped: Vec<String> = self.dropped.iter().map(|d| d.value.to_string()).collect();
            write!(f, " dropped [{}]", dropped.join(", "))?;
        }
        write!(f, " = {}", self.total())
    }
}
