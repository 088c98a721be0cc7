use std::fmt;

use serde::{Deserialize, Serialize};

/// The formula variable that reads the class's base value for the stat.
pub const BASE_VARIABLE: &str = "base";

/// Which table a derived stat belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DerivedStatKind {
    /// A defensive stat computed from a formula.
    Defense,
    /// An offensive stat read directly from class base values.
    NonCalculated,
    /// Any other grouping.
    Other(String),
}

impl From<String> for DerivedStatKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "DEFENSE" => Self::Defense,
            "NON-CALCULATED" => Self::NonCalculated,
            _ => Self::Other(s),
        }
    }
}

impl From<DerivedStatKind> for String {
    fn from(kind: DerivedStatKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for DerivedStatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defense => write!(f, "DEFENSE"),
            Self::NonCalculated => write!(f, "NON-CALCULATED"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Replaces a derived stat's formula for one class once it has a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatOverride {
    /// Class the override applies to.
    #[serde(rename = "classId")]
    pub class_id: String,
    /// Class feature name that must be present.
    #[serde(rename = "abilityName")]
    pub ability_name: String,
    /// Minimum character level.
    #[serde(rename = "minLevel", default)]
    pub min_level: u32,
    /// Replacement formula.
    #[serde(rename = "newFormula", default, skip_serializing_if = "Option::is_none")]
    pub new_formula: Option<String>,
    /// Replacement variable list.
    #[serde(rename = "newVariables", default, skip_serializing_if = "Option::is_none")]
    pub new_variables: Option<Vec<String>>,
}

/// A combat or defense statistic computed from class values and modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStat {
    /// Record id; also the key into class base values.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Rules text.
    #[serde(default)]
    pub description: String,
    /// Table grouping.
    #[serde(rename = "type")]
    pub kind: DerivedStatKind,
    /// Arithmetic formula over `variables`.
    #[serde(default)]
    pub formula: String,
    /// Variables referenced by the formula: `base` or `<abbr>_mod`.
    #[serde(default)]
    pub variables: Vec<String>,
    /// Classes the stat applies to; `None` means all classes.
    #[serde(rename = "applicableClassIds", default, skip_serializing_if = "Option::is_none")]
    pub applicable_class_ids: Option<Vec<String>>,
    /// Class-specific formula replacements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<Vec<StatOverride>>,
}

impl DerivedStat {
    /// Returns true if the stat is shown for the given class.
    pub fn applies_to(&self, class_id: &str) -> bool {
        self.applicable_class_ids
            .as_ref()
            .is_none_or(|ids| ids.iter().any(|id| id == class_id))
    }

    /// All overrides, or an empty slice.
    pub fn overrides(&self) -> &[StatOverride] {
        self.overrides.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_strings() {
        for raw in ["DEFENSE", "NON-CALCULATED", "UTILITY"] {
            let kind = DerivedStatKind::from(raw.to_string());
            assert_eq!(String::from(kind), raw);
        }
        assert_eq!(
            DerivedStatKind::from("DEFENSE".to_string()),
            DerivedStatKind::Defense
        );
    }

    #[test]
    fn applicability() {
        let json = r#"{
            "id": "sneak_attack", "name": "Sneak Attack", "type": "NON-CALCULATED",
            "applicableClassIds": ["thief"]
        }"#;
        let stat: DerivedStat = serde_json::from_str(json).unwrap();
        assert!(stat.applies_to("thief"));
        assert!(!stat.applies_to("warrior"));
        assert!(stat.overrides().is_empty());

        let open = DerivedStat {
            applicable_class_ids: None,
            ..stat
        };
        assert!(open.applies_to("warrior"));
    }

    #[test]
    fn override_fields_are_optional() {
        let json = r#"{"classId": "warrior", "abilityName": "Shield Wall", "minLevel": 3, "newFormula": "base + 2"}"#;
        let o: StatOverride = serde_json::from_str(json).unwrap();
        assert_eq!(o.new_formula.as_deref(), Some("base + 2"));
        assert!(o.new_variables.is_none());
    }
}
