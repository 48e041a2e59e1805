//! Builders shared by the unit tests of this crate.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use crate::accounts::{Account, AccountStatus, AccountType, PayoutFrequency};
use crate::events::ReplaceReason;
use crate::payouts::{Payout, PayoutStatus};
use crate::store::{Document, InMemoryDocumentRepository, RecordStore};
use crate::trades::{Direction, Trade, TradeAccount};

pub fn account(id: &str, initial_funding: f64, profit_split: f64) -> Account {
    Account {
        id: id.to_string(),
        name: format!("Account {}", id),
        account_type: AccountType::Futures,
        status: AccountStatus::Funded,
        date_created: Utc::now() - Duration::days(365),
        initial_funding,
        current_funding: initial_funding,
        profit_split,
        payout_frequency: PayoutFrequency::Monthly,
        firm_id: None,
        default_weight: 1.0,
    }
}

pub fn trade_at(id: &str, result_net: f64, accounts: &[(&str, f64)], at: DateTime<Utc>) -> Trade {
    let accounts: Vec<TradeAccount> = accounts
        .iter()
        .map(|(account_id, weight)| TradeAccount::new(*account_id, *weight))
        .collect();
    Trade {
        id: id.to_string(),
        entry_datetime: at - Duration::minutes(30),
        exit_datetime: Some(at),
        asset: "NQ".to_string(),
        direction: Direction::Long,
        volume: 1.0,
        entry_price: 0.0,
        exit_price: 0.0,
        strategy_id: None,
        account_id: accounts.first().map(|a| a.account_id.clone()),
        accounts,
        result_gross: result_net,
        commission: 0.0,
        fees: 0.0,
        swap: 0.0,
        slippage: 0.0,
        result_net,
        result_r: 0.0,
        partial_executions: vec![],
        checklist_results: serde_json::Value::Null,
        notes: None,
    }
}

/// A trade closed `days_ago` days before now.
pub fn trade(id: &str, result_net: f64, accounts: &[(&str, f64)], days_ago: i64) -> Trade {
    trade_at(id, result_net, accounts, Utc::now() - Duration::days(days_ago))
}

/// Same as [`trade`] with an explicit R-multiple.
pub fn trade_r(id: &str, result_net: f64, result_r: f64, account_id: &str, days_ago: i64) -> Trade {
    let mut t = trade(id, result_net, &[(account_id, 1.0)], days_ago);
    t.result_r = result_r;
    t
}

pub fn payout(id: &str, amount: f64, account_ids: &[&str], days_ago: i64) -> Payout {
    Payout {
        id: id.to_string(),
        date_created: Utc::now() - Duration::days(days_ago),
        amount_solicited: amount,
        method: "Wise".to_string(),
        status: PayoutStatus::Completed,
        account_ids: account_ids.iter().map(|s| s.to_string()).collect(),
        split_by_account: BTreeMap::new(),
        total_net: 0.0,
        total_fee: 0.0,
        payout_type: None,
        approved_date: None,
    }
}

/// A record store over an empty in-memory repository.
pub fn memory_store() -> Arc<RecordStore> {
    Arc::new(
        RecordStore::open(Arc::new(InMemoryDocumentRepository::new()))
            .expect("in-memory store opens"),
    )
}

/// A record store seeded with `document`.
pub async fn store_with(document: Document) -> Arc<RecordStore> {
    let store = memory_store();
    store
        .replace(document, ReplaceReason::Reload)
        .await
        .expect("seed document");
    store
}
