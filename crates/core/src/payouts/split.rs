//! Payout split engine.
//!
//! A gross withdrawal is divided equally across the linked accounts (never
//! proportionally to funding or weight); each share is then cut into the
//! trader's net and the firm's fee using that account's profit split.

use std::collections::BTreeMap;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::payouts_model::SplitEntry;
use crate::accounts::Account;
use crate::constants::DISPLAY_DECIMAL_PRECISION;

/// An account taking part in a split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitParticipant {
    pub account_id: String,
    /// `None` means the trader keeps the whole share.
    pub profit_split: Option<f64>,
}

impl From<&Account> for SplitParticipant {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id.clone(),
            profit_split: Some(account.profit_split),
        }
    }
}

/// Result of splitting one gross amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitResult {
    pub total_net: f64,
    pub total_fee: f64,
    pub split_map: BTreeMap<String, SplitEntry>,
    /// Amount debited from each account's funding.
    pub deductions: BTreeMap<String, f64>,
}

fn round_decimal(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_DECIMAL_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a money amount to display precision, half away from zero.
pub fn round_money(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(round_decimal)
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Cent-exact shares of `amount` that add up to the rounded amount.
/// Leftover cents go to the first participants, one each.
fn cent_shares(amount: Decimal, count: usize) -> Vec<Decimal> {
    let cents = round_decimal(amount) * Decimal::ONE_HUNDRED;
    let divisor = Decimal::from(count);
    let base = (cents / divisor).trunc();
    let mut leftover = cents - base * divisor;
    (0..count)
        .map(|_| {
            let mut share = base;
            if leftover >= Decimal::ONE {
                share += Decimal::ONE;
                leftover -= Decimal::ONE;
            } else if leftover <= Decimal::NEGATIVE_ONE {
                share -= Decimal::ONE;
                leftover += Decimal::ONE;
            }
            share / Decimal::ONE_HUNDRED
        })
        .collect()
}

/// Splits `amount` equally across `participants`.
///
/// `gross` and the funding deduction are the exact equal share. Net and fee
/// are computed from that share in whole cents, with leftover cents spread
/// so that `total_net + total_fee` equals the amount rounded to cents.
/// An empty participant list yields zeroed totals and empty maps.
pub fn compute_split(amount: f64, participants: &[SplitParticipant]) -> SplitResult {
    if participants.is_empty() {
        return SplitResult::default();
    }

    let share = amount / participants.len() as f64;
    let amount_decimal = Decimal::from_f64(amount).unwrap_or_default();
    let mut result = SplitResult::default();
    let mut total_net = Decimal::ZERO;
    let mut total_fee = Decimal::ZERO;

    for (participant, cents) in participants
        .iter()
        .zip(cent_shares(amount_decimal, participants.len()))
    {
        let ratio = participant
            .profit_split
            .and_then(Decimal::from_f64)
            .unwrap_or(Decimal::ONE);
        let net = round_decimal(cents * ratio);
        let fee = cents - net;
        total_net += net;
        total_fee += fee;

        result.split_map.insert(
            participant.account_id.clone(),
            SplitEntry {
                gross: share,
                net: net.to_f64().unwrap_or_default(),
                fee: fee.to_f64().unwrap_or_default(),
            },
        );
        result
            .deductions
            .insert(participant.account_id.clone(), share);
    }

    result.total_net = total_net.to_f64().unwrap_or_default();
    result.total_fee = total_fee.to_f64().unwrap_or_default();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(id: &str, split: Option<f64>) -> SplitParticipant {
        SplitParticipant {
            account_id: id.to_string(),
            profit_split: split,
        }
    }

    #[test]
    fn test_single_account_split() {
        let result = compute_split(100.0, &[participant("A", Some(0.8))]);
        assert_eq!(
            result.split_map["A"],
            SplitEntry {
                gross: 100.0,
                net: 80.0,
                fee: 20.0
            }
        );
        assert_eq!(result.total_net, 80.0);
        assert_eq!(result.total_fee, 20.0);
        assert_eq!(result.deductions["A"], 100.0);
    }

    #[test]
    fn test_equal_split_with_different_ratios() {
        let result = compute_split(
            1000.0,
            &[participant("A", Some(0.9)), participant("B", Some(0.5))],
        );
        assert_eq!(result.split_map["A"].gross, 500.0);
        assert_eq!(result.split_map["A"].net, 450.0);
        assert_eq!(result.split_map["B"].net, 250.0);
        assert_eq!(result.split_map["B"].fee, 250.0);
        assert_eq!(result.total_net, 700.0);
        assert_eq!(result.total_fee, 300.0);
    }

    #[test]
    fn test_missing_ratio_keeps_whole_share() {
        let result = compute_split(300.0, &[participant("A", None)]);
        assert_eq!(result.split_map["A"].net, 300.0);
        assert_eq!(result.split_map["A"].fee, 0.0);
    }

    #[test]
    fn test_rounding_to_cents() {
        let result = compute_split(
            100.0,
            &[
                participant("A", Some(0.8)),
                participant("B", Some(0.8)),
                participant("C", Some(0.8)),
            ],
        );
        let a = result.split_map["A"];
        assert!((a.gross - 33.333333333).abs() < 1e-6);
        assert_eq!(a.net, 26.67);
        assert_eq!(a.fee, 6.67);
        assert_eq!(result.split_map["C"].net, 26.66);
        assert_eq!(result.split_map["C"].fee, 6.67);
        assert_eq!(result.total_net, 79.99);
        assert_eq!(result.total_fee, 20.01);
    }

    #[test]
    fn test_totals_reconcile_to_amount_for_many_accounts() {
        let participants: Vec<SplitParticipant> = (0..6)
            .map(|i| participant(&format!("acc-{}", i), Some(0.8)))
            .collect();
        let result = compute_split(100.0, &participants);
        assert_eq!(result.total_net, 80.02);
        assert_eq!(result.total_fee, 19.98);
        assert!((result.total_net + result.total_fee - 100.0).abs() < 1e-9);
        let deducted: f64 = result.deductions.values().sum();
        assert!((deducted - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_accounts_yields_zeroed_result() {
        let result = compute_split(500.0, &[]);
        assert_eq!(result, SplitResult::default());
    }

    #[test]
    fn test_round_money_to_cents() {
        assert_eq!(round_money(1.234), 1.23);
        assert_eq!(round_money(1.236), 1.24);
        assert_eq!(round_money(-7.019), -7.02);
        assert_eq!(round_money(10.0), 10.0);
    }
}
