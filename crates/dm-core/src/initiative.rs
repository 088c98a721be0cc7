use serde::{Deserialize, Serialize};

/// One row of the initiative chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeEntry {
    /// Dexterity modifier this row applies to.
    pub modifier: i32,
    /// Dice rolled for initiative at this modifier (e.g. "1d6").
    #[serde(rename = "diceRolled")]
    pub dice_rolled: String,
}

/// The initiative chart record, an ordered list of entries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InitiativeChart {
    /// Chart rows in source order.
    #[serde(rename = "initiativeDice", default)]
    pub entries: Vec<InitiativeEntry>,
}

impl InitiativeChart {
    /// The first entry for a modifier.
    pub fn entry_for(&self, modifier: i32) -> Option<&InitiativeEntry> {
        self.entries.iter().find(|e| e.modifier == modifier)
    }

    /// Returns true if the chart has no rows.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
