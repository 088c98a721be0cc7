use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A player's house, which owns their characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerHouse {
    /// Record id, assigned by the store.
    #[serde(default)]
    pub id: String,
    /// House name.
    pub name: String,
    /// House motto.
    #[serde(default)]
    pub motto: String,
    /// House history.
    #[serde(default)]
    pub bio: String,
    /// Treasury.
    #[serde(default)]
    pub gold: i64,
    /// Owning player id.
    #[serde(rename = "playerId")]
    pub player_id: String,
    /// Home county id.
    #[serde(rename = "countyId", default)]
    pub county_id: String,
    /// When the house was founded.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Form state for founding a new house.
#[derive(Debug, Clone, Default)]
pub struct HouseDraft {
    /// House name; required.
    pub name: String,
    /// House motto.
    pub motto: String,
    /// Home county; required.
    pub county_id: String,
    /// House history.
    pub bio: String,
}

impl HouseDraft {
    /// Every problem that blocks founding the house.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("House name is required".to_string());
        }
        if self.county_id.is_empty() {
            errors.push("Please Select A County".to_string());
        }
        errors
    }

    /// Build the house record for a player. New houses start with no gold.
    pub fn into_house(
        self,
        player_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<PlayerHouse, Vec<String>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(PlayerHouse {
            id: String::new(),
            name: self.name.trim().to_string(),
            motto: self.motto,
            bio: self.bio,
            gold: 0,
            player_id: player_id.into(),
            county_id: self.county_id,
            created_at: Some(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_reports_every_missing_field() {
        let errors = HouseDraft::default().validate();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn draft_builds_house_with_zero_gold() {
        let draft = HouseDraft {
            name: "  House Thistle ".into(),
            motto: "Small but sharp".into(),
            county_id: "barley".into(),
            bio: String::new(),
        };
        let house = draft.into_house("player-1", Utc::now()).unwrap();
        assert_eq!(house.name, "House Thistle");
        assert_eq!(house.gold, 0);
        assert_eq!(house.player_id, "player-1");
        assert!(house.created_at.is_some());
    }

    #[test]
    fn blank_name_is_rejected() {
        let draft = HouseDraft {
            name: "   ".into(),
            county_id: "barley".into(),
            ..Default::default()
        };
        let errors = draft.into_house("p", Utc::now()).unwrap_err();
        assert_eq!(errors, vec!["House name is required".to_string()]);
    }
}
