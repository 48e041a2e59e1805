//! Payout domain models.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::split::SplitResult;
use crate::errors::{Error, Result, ValidationError};

/// Processing state of a withdrawal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PayoutStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl PayoutStatus {
    /// Cancelled payouts neither debit accounts nor count as income.
    pub fn is_effective(self) -> bool {
        !matches!(self, PayoutStatus::Cancelled)
    }
}

/// One account's share of a payout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct SplitEntry {
    /// Equal share of the solicited amount, debited from the account.
    pub gross: f64,
    /// Part of `gross` the trader keeps.
    pub net: f64,
    /// Part of `gross` retained by the firm.
    pub fee: f64,
}

/// Domain model representing a payout (withdrawal) across linked accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payout {
    pub id: String,
    pub date_created: DateTime<Utc>,
    /// Gross amount requested, split equally across `account_ids`.
    pub amount_solicited: f64,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub status: PayoutStatus,
    #[serde(default)]
    pub account_ids: Vec<String>,
    #[serde(default)]
    pub split_by_account: BTreeMap<String, SplitEntry>,
    #[serde(default)]
    pub total_net: f64,
    #[serde(default)]
    pub total_fee: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub payout_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_date: Option<DateTime<Utc>>,
}

impl Payout {
    /// Amount each linked account is debited. Zero without accounts.
    pub fn debit_per_account(&self) -> f64 {
        if self.account_ids.is_empty() {
            0.0
        } else {
            self.amount_solicited / self.account_ids.len() as f64
        }
    }

    /// Net payout attributable to the given accounts (all when empty).
    pub fn net_for_accounts(&self, account_ids: &[String]) -> f64 {
        if account_ids.is_empty() {
            return self.split_by_account.values().map(|s| s.net).sum();
        }
        self.split_by_account
            .iter()
            .filter(|(id, _)| account_ids.contains(id))
            .map(|(_, s)| s.net)
            .sum()
    }

    /// Stores a freshly computed split.
    pub fn apply_split(&mut self, split: SplitResult) {
        self.split_by_account = split.split_map;
        self.total_net = split.total_net;
        self.total_fee = split.total_fee;
    }
}

/// Input model for creating a payout.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewPayout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub date_created: Option<DateTime<Utc>>,
    pub amount_solicited: f64,
    #[serde(default)]
    pub method: String,
    pub status: Option<PayoutStatus>,
    #[serde(default)]
    pub account_ids: Vec<String>,
    #[serde(rename = "type")]
    pub payout_type: Option<String>,
    pub approved_date: Option<DateTime<Utc>>,
}

impl NewPayout {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount_solicited)?;
        validate_account_ids(&self.account_ids)
    }

    /// Builds the payout without its split; the caller computes it.
    pub fn into_payout(self, id: String, now: DateTime<Utc>) -> Payout {
        Payout {
            id,
            date_created: self.date_created.unwrap_or(now),
            amount_solicited: self.amount_solicited,
            method: self.method,
            status: self.status.unwrap_or_default(),
            account_ids: self.account_ids,
            split_by_account: BTreeMap::new(),
            total_net: 0.0,
            total_fee: 0.0,
            payout_type: self.payout_type,
            approved_date: self.approved_date,
        }
    }
}

/// Input model for updating a payout. `None` leaves a field as-is.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PayoutUpdate {
    pub id: String,
    pub date_created: Option<DateTime<Utc>>,
    pub amount_solicited: Option<f64>,
    pub method: Option<String>,
    pub status: Option<PayoutStatus>,
    pub account_ids: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub payout_type: Option<String>,
    pub approved_date: Option<DateTime<Utc>>,
}

impl PayoutUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "id".to_string(),
            )));
        }
        if let Some(amount) = self.amount_solicited {
            validate_amount(amount)?;
        }
        if let Some(account_ids) = &self.account_ids {
            validate_account_ids(account_ids)?;
        }
        Ok(())
    }

    /// True when the split has to be recomputed.
    pub fn changes_split(&self, current: &Payout) -> bool {
        self.amount_solicited
            .is_some_and(|amount| amount != current.amount_solicited)
            || self
                .account_ids
                .as_ref()
                .is_some_and(|ids| ids != &current.account_ids)
    }

    /// Applies every field but the split.
    pub fn apply_to(self, payout: &mut Payout) {
        if let Some(date_created) = self.date_created {
            payout.date_created = date_created;
        }
        if let Some(amount) = self.amount_solicited {
            payout.amount_solicited = amount;
        }
        if let Some(method) = self.method {
            payout.method = method;
        }
        if let Some(status) = self.status {
            payout.status = status;
        }
        if let Some(account_ids) = self.account_ids {
            payout.account_ids = account_ids;
        }
        if let Some(payout_type) = self.payout_type {
            payout.payout_type = Some(payout_type);
        }
        if let Some(approved_date) = self.approved_date {
            payout.approved_date = Some(approved_date);
        }
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Payout amount must be a non-negative number, got {}",
            amount
        ))));
    }
    Ok(())
}

fn validate_account_ids(account_ids: &[String]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for id in account_ids {
        if !seen.insert(id.as_str()) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Account {} is linked to the payout more than once",
                id
            ))));
        }
    }
    Ok(())
}
