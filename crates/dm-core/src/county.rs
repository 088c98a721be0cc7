use serde::{Deserialize, Serialize};

use crate::stat::StatKey;

/// A county a mouse hails from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct County {
    /// Record id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Flavor text.
    #[serde(default)]
    pub description: String,
    /// The stat that may be rolled with the preferred method.
    #[serde(rename = "associatedStatId")]
    pub associated_stat_id: String,
    /// Skill names associated with the county (display only).
    #[serde(rename = "associatedSkills", default)]
    pub associated_skills: Vec<String>,
}

impl County {
    /// The associated stat as a key, if the id names one of the six stats.
    pub fn associated_stat(&self) -> Option<StatKey> {
        StatKey::from_id(&self.associated_stat_id)
    }
}
