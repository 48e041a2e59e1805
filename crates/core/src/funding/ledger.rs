//! Funding reconciliation.
//!
//! An account's balance is `initial_funding + Σ(result_net · weight)` over the
//! trades attributed to it, minus the equal-share debit of every effective
//! (non-cancelled) payout it is linked to. Mutations move balances through
//! per-account deltas; [`recalc_account_funding`] rebuilds a balance from
//! history with the same formula, so both paths agree.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::accounts::Account;
use crate::constants::FUNDING_EPSILON;
use crate::payouts::Payout;
use crate::trades::Trade;

/// Tolerance when comparing a stored balance with its recompute.
const RECONCILE_TOLERANCE: f64 = 1e-6;

/// Net balance change per account id.
pub type FundingDeltas = BTreeMap<String, f64>;

fn drop_negligible(mut deltas: FundingDeltas) -> FundingDeltas {
    deltas.retain(|_, delta| delta.abs() >= FUNDING_EPSILON);
    deltas
}

/// Balance changes caused by replacing `old` with `new`.
///
/// `old` is `None` for a new trade and `new` is `None` for a deletion. The old
/// attribution is reverted and the new one applied, so an edit that also moves
/// the trade between accounts settles both sides. Deltas below
/// [`FUNDING_EPSILON`] are dropped.
pub fn trade_funding_deltas(old: Option<&Trade>, new: Option<&Trade>) -> FundingDeltas {
    let mut deltas = FundingDeltas::new();
    if let Some(old) = old {
        for entry in &old.accounts {
            *deltas.entry(entry.account_id.clone()).or_insert(0.0) -= old.result_net * entry.weight;
        }
    }
    if let Some(new) = new {
        for entry in &new.accounts {
            *deltas.entry(entry.account_id.clone()).or_insert(0.0) += new.result_net * entry.weight;
        }
    }
    drop_negligible(deltas)
}

/// Balance changes caused by replacing payout `old` with `new`.
///
/// The old debit is credited back before the new one is taken. Debits are
/// never floored at zero, which keeps revert-then-apply exact.
pub fn payout_funding_deltas(old: Option<&Payout>, new: Option<&Payout>) -> FundingDeltas {
    let mut deltas = FundingDeltas::new();
    if let Some(old) = old.filter(|p| p.status.is_effective()) {
        let debit = old.debit_per_account();
        for account_id in &old.account_ids {
            *deltas.entry(account_id.clone()).or_insert(0.0) += debit;
        }
    }
    if let Some(new) = new.filter(|p| p.status.is_effective()) {
        let debit = new.debit_per_account();
        for account_id in &new.account_ids {
            *deltas.entry(account_id.clone()).or_insert(0.0) -= debit;
        }
    }
    drop_negligible(deltas)
}

/// Adds each delta to the matching account's `current_funding`.
///
/// Unknown account ids are skipped. Returns the ids actually touched.
pub fn apply_deltas(accounts: &mut [Account], deltas: &FundingDeltas) -> Vec<String> {
    let mut touched = Vec::with_capacity(deltas.len());
    for (account_id, delta) in deltas {
        match accounts.iter_mut().find(|a| &a.id == account_id) {
            Some(account) => {
                account.current_funding += delta;
                touched.push(account_id.clone());
            }
            None => debug!("Skipping funding delta {} for unknown account {}", delta, account_id),
        }
    }
    touched
}

/// Rebuilds an account's balance from its full history.
pub fn recalc_account_funding(account: &Account, trades: &[Trade], payouts: &[Payout]) -> f64 {
    let trade_total: f64 = trades
        .iter()
        .flat_map(|trade| {
            trade
                .accounts
                .iter()
                .filter(|entry| entry.account_id == account.id)
                .map(move |entry| trade.result_net * entry.weight)
        })
        .sum();

    let payout_total: f64 = payouts
        .iter()
        .filter(|p| p.status.is_effective() && p.account_ids.contains(&account.id))
        .map(Payout::debit_per_account)
        .sum();

    account.initial_funding + trade_total - payout_total
}

/// Stored versus recomputed balance of one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingReconciliation {
    pub account_id: String,
    pub stored: f64,
    pub recomputed: f64,
    pub difference: f64,
}

impl FundingReconciliation {
    pub fn is_consistent(&self) -> bool {
        self.difference.abs() < RECONCILE_TOLERANCE
    }
}

/// Compares every account's stored balance with a full recompute.
pub fn reconcile(accounts: &[Account], trades: &[Trade], payouts: &[Payout]) -> Vec<FundingReconciliation> {
    accounts
        .iter()
        .map(|account| {
            let recomputed = recalc_account_funding(account, trades, payouts);
            FundingReconciliation {
                account_id: account.id.clone(),
                stored: account.current_funding,
                recomputed,
                difference: account.current_funding - recomputed,
            }
        })
        .collect()
}
