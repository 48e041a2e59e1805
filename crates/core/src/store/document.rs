//! The persisted document: every collection the dashboard keeps.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::accounts::Account;
use crate::errors::Result;
use crate::firms::Firm;
use crate::goals::Goal;
use crate::payouts::Payout;
use crate::settings::Settings;
use crate::tags::Tag;
use crate::trades::{normalize_attribution, Trade};

/// Top-level JSON document. Missing keys default to empty collections so
/// documents written by older versions load unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Document {
    pub accounts: Vec<Account>,
    pub payouts: Vec<Payout>,
    pub settings: Settings,
    pub firms: Vec<Firm>,
    pub trades: Vec<Trade>,
    pub goals: Vec<Goal>,
    pub tags: Vec<Tag>,
}

impl Document {
    /// A fresh document with default settings.
    pub fn seed() -> Self {
        Self {
            settings: Settings::seed(),
            ..Self::default()
        }
    }

    /// Parses and migrates a persisted document.
    pub fn from_json(payload: &str) -> Result<Self> {
        let document: Document = serde_json::from_str(payload)?;
        Ok(document.migrate())
    }

    /// Same as [`Document::from_json`] for an already-parsed value.
    pub fn from_value(value: Value) -> Result<Self> {
        let document: Document = serde_json::from_value(value)?;
        Ok(document.migrate())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn migrate(mut self) -> Self {
        for trade in &mut self.trades {
            normalize_attribution(trade);
        }
        for goal in &mut self.goals {
            for sub_goal in &mut goal.sub_goals {
                if sub_goal.id.is_empty() {
                    sub_goal.id = uuid::Uuid::new_v4().to_string();
                }
            }
        }
        self
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn account_mut(&mut self, id: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id == id)
    }

    pub fn trade(&self, id: &str) -> Option<&Trade> {
        self.trades.iter().find(|t| t.id == id)
    }

    pub fn payout(&self, id: &str) -> Option<&Payout> {
        self.payouts.iter().find(|p| p.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn firm(&self, id: &str) -> Option<&Firm> {
        self.firms.iter().find(|f| f.id == id)
    }

    pub fn tag(&self, id: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_default_to_empty() {
        let document = Document::from_json(r#"{"accounts": []}"#).unwrap();
        assert!(document.trades.is_empty());
        assert!(document.goals.is_empty());
        assert!(document.settings.methods.is_empty());
        assert!(!document.settings.auto_backup.enabled);
    }

    #[test]
    fn test_seed_has_payout_methods() {
        let document = Document::seed();
        assert!(document.settings.methods.contains(&"Wise".to_string()));
        assert!(document.accounts.is_empty());
    }

    #[test]
    fn test_legacy_trade_is_migrated_to_weighted_attribution() {
        let payload = r#"{
            "trades": [{
                "id": "t1",
                "entry_datetime": "2026-01-05T10:00:00Z",
                "exit_datetime": "2026-01-05T11:00:00Z",
                "asset": "ES",
                "direction": "Long",
                "accountId": "A",
                "result_net": 150.0,
                "result_R": 1.5
            }]
        }"#;
        let document = Document::from_json(payload).unwrap();
        let trade = &document.trades[0];
        assert_eq!(trade.accounts.len(), 1);
        assert_eq!(trade.accounts[0].account_id, "A");
        assert_eq!(trade.accounts[0].weight, 1.0);
        assert_eq!(trade.result_r, 1.5);
    }

    #[test]
    fn test_wire_format_keys() {
        let document = Document::seed();
        let value = document.to_value().unwrap();
        for key in ["accounts", "payouts", "settings", "firms", "trades", "goals", "tags"] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert!(value["settings"]["methods"].is_array());
    }

    #[test]
    fn test_malformed_payload_is_a_validation_error() {
        let err = Document::from_json("{not json").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Validation(crate::errors::ValidationError::MalformedDocument(_))
        ));
    }
}
