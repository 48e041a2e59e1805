//! Domain event types.

use serde::{Deserialize, Serialize};

/// Domain events emitted by the record store after successful mutations.
///
/// Every variant except `GoalCompleted` is a "data changed" signal. Consumers
/// re-fetch the full snapshot on receipt; the ids are hints, not diffs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Accounts were created, updated, deleted or had their funding moved.
    AccountsChanged { account_ids: Vec<String> },

    /// Trades were created, updated, or deleted.
    TradesChanged {
        trade_ids: Vec<String>,
        /// Accounts whose funding was touched by the change
        account_ids: Vec<String>,
    },

    /// Payouts were created, updated, or deleted.
    PayoutsChanged {
        payout_ids: Vec<String>,
        account_ids: Vec<String>,
    },

    /// Goals or sub-goals were created, updated, archived, or deleted.
    GoalsChanged { goal_ids: Vec<String> },

    /// Firms were created, updated, or deleted.
    FirmsChanged { firm_ids: Vec<String> },

    /// Tags were created, updated, or deleted.
    TagsChanged { tag_ids: Vec<String> },

    /// The settings object was replaced.
    SettingsChanged,

    /// The whole document was swapped (restore from backup, reload).
    DocumentReplaced { reason: ReplaceReason },

    /// A goal reached completion. Emitted once per completion.
    GoalCompleted { goal_id: String, title: String },
}

/// Why the in-memory document was replaced wholesale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplaceReason {
    Restore,
    Reload,
}

impl DomainEvent {
    /// Creates an AccountsChanged event.
    pub fn accounts_changed(account_ids: Vec<String>) -> Self {
        Self::AccountsChanged { account_ids }
    }

    /// Creates a TradesChanged event.
    pub fn trades_changed(trade_ids: Vec<String>, account_ids: Vec<String>) -> Self {
        Self::TradesChanged {
            trade_ids,
            account_ids,
        }
    }

    /// Creates a PayoutsChanged event.
    pub fn payouts_changed(payout_ids: Vec<String>, account_ids: Vec<String>) -> Self {
        Self::PayoutsChanged {
            payout_ids,
            account_ids,
        }
    }

    /// Creates a GoalsChanged event.
    pub fn goals_changed(goal_ids: Vec<String>) -> Self {
        Self::GoalsChanged { goal_ids }
    }

    /// Creates a FirmsChanged event.
    pub fn firms_changed(firm_ids: Vec<String>) -> Self {
        Self::FirmsChanged { firm_ids }
    }

    /// Creates a TagsChanged event.
    pub fn tags_changed(tag_ids: Vec<String>) -> Self {
        Self::TagsChanged { tag_ids }
    }

    /// Creates a DocumentReplaced event.
    pub fn document_replaced(reason: ReplaceReason) -> Self {
        Self::DocumentReplaced { reason }
    }

    /// Creates a GoalCompleted event.
    pub fn goal_completed(goal_id: String, title: String) -> Self {
        Self::GoalCompleted { goal_id, title }
    }

    /// True for events that may move goal progress.
    pub fn affects_goal_progress(&self) -> bool {
        matches!(
            self,
            Self::AccountsChanged { .. }
                | Self::TradesChanged { .. }
                | Self::PayoutsChanged { .. }
                | Self::DocumentReplaced { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_event_serialization() {
        let event = DomainEvent::trades_changed(vec!["t1".to_string()], vec!["acc1".to_string()]);

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("trades_changed"));

        let deserialized: DomainEvent = serde_json::from_str(&json).unwrap();
        match deserialized {
            DomainEvent::TradesChanged {
                trade_ids,
                account_ids,
            } => {
                assert_eq!(trade_ids, vec!["t1"]);
                assert_eq!(account_ids, vec!["acc1"]);
            }
            _ => panic!("Expected TradesChanged"),
        }
    }

    #[test]
    fn test_document_replaced_serialization() {
        let event = DomainEvent::document_replaced(ReplaceReason::Restore);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "document_replaced");
        assert_eq!(json["reason"], "restore");
    }

    #[test]
    fn test_affects_goal_progress() {
        assert!(DomainEvent::payouts_changed(vec![], vec![]).affects_goal_progress());
        assert!(!DomainEvent::goals_changed(vec![]).affects_goal_progress());
        assert!(!DomainEvent::goal_completed("g".into(), "G".into()).affects_goal_progress());
    }
}
