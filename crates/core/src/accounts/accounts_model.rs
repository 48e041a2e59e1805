//! Account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::accounts_constants::{DEFAULT_ACCOUNT_WEIGHT, DEFAULT_PROFIT_SPLIT};
use crate::{errors::ValidationError, Error, Result};

/// Market category an account trades in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountType {
    #[default]
    Futures,
    Forex,
    /// Crypto accounts; the persisted spelling is kept as-is.
    Cripto,
    Personal,
}

/// Lifecycle status of a funded/challenge account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AccountStatus {
    Live,
    Funded,
    #[default]
    Challenge,
    #[serde(rename = "Challenge Concluido")]
    ChallengeConcluded,
    Standby,
}

/// How often the firm pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayoutFrequency {
    Daily,
    Weekly,
    Biweekly,
    #[default]
    Monthly,
}

fn default_profit_split() -> f64 {
    DEFAULT_PROFIT_SPLIT
}

fn default_weight() -> f64 {
    DEFAULT_ACCOUNT_WEIGHT
}

/// Domain model representing a trading account.
///
/// `current_funding` is maintained incrementally by the funding ledger and
/// must equal `initial_funding + Σ(weighted trade net) − Σ(payout debits)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub account_type: AccountType,
    #[serde(default)]
    pub status: AccountStatus,
    pub date_created: DateTime<Utc>,
    #[serde(default)]
    pub initial_funding: f64,
    #[serde(default)]
    pub current_funding: f64,
    /// Fraction of a payout kept by the trader, in `0..=1`.
    #[serde(default = "default_profit_split")]
    pub profit_split: f64,
    #[serde(default)]
    pub payout_frequency: PayoutFrequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firm_id: Option<String>,
    #[serde(default = "default_weight")]
    pub default_weight: f64,
}

/// Input model for creating a new account.
///
/// Every field but `name` is optional and falls back to the documented
/// defaults: Futures / Challenge / monthly payouts, zero funding, a profit
/// split of 1 and a default weight of 1. A new account always starts at its
/// initial funding; a `currentFunding` key in the input is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    pub status: Option<AccountStatus>,
    pub date_created: Option<DateTime<Utc>>,
    pub initial_funding: Option<f64>,
    pub profit_split: Option<f64>,
    pub payout_frequency: Option<PayoutFrequency>,
    pub firm_id: Option<String>,
    pub default_weight: Option<f64>,
}

impl NewAccount {
    /// Validates the new account data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account name cannot be empty".to_string(),
            )));
        }
        validate_profit_split(self.profit_split)?;
        validate_weight(self.default_weight)?;
        Ok(())
    }

    /// Builds the account, filling defaults. Does not validate.
    pub fn into_account(self, id: String, now: DateTime<Utc>) -> Account {
        let initial_funding = self.initial_funding.unwrap_or(0.0);
        Account {
            id,
            name: self.name.trim().to_string(),
            account_type: self.account_type.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            date_created: self.date_created.unwrap_or(now),
            initial_funding,
            current_funding: initial_funding,
            profit_split: self.profit_split.unwrap_or(DEFAULT_PROFIT_SPLIT),
            payout_frequency: self.payout_frequency.unwrap_or_default(),
            firm_id: self.firm_id,
            default_weight: self.default_weight.unwrap_or(DEFAULT_ACCOUNT_WEIGHT),
        }
    }
}

/// Input model for updating an existing account. `None` leaves a field as-is.
///
/// `current_funding` is deliberately absent: balances only move through the
/// funding ledger. Changing `initial_funding` shifts the balance by the same
/// amount.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    pub status: Option<AccountStatus>,
    pub initial_funding: Option<f64>,
    pub profit_split: Option<f64>,
    pub payout_frequency: Option<PayoutFrequency>,
    /// `Some(None)` detaches the account from its firm.
    #[serde(default, with = "crate::utils::double_option")]
    pub firm_id: Option<Option<String>>,
    pub default_weight: Option<f64>,
}

impl AccountUpdate {
    /// Validates the account update data.
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account ID is required for updates".to_string(),
            )));
        }
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Account name cannot be empty".to_string(),
                )));
            }
        }
        validate_profit_split(self.profit_split)?;
        validate_weight(self.default_weight)?;
        Ok(())
    }

    /// Applies the update onto an existing account.
    pub fn apply_to(self, account: &mut Account) {
        if let Some(name) = self.name {
            account.name = name.trim().to_string();
        }
        if let Some(account_type) = self.account_type {
            account.account_type = account_type;
        }
        if let Some(status) = self.status {
            account.status = status;
        }
        if let Some(initial_funding) = self.initial_funding {
            account.current_funding += initial_funding - account.initial_funding;
            account.initial_funding = initial_funding;
        }
        if let Some(profit_split) = self.profit_split {
            account.profit_split = profit_split;
        }
        if let Some(payout_frequency) = self.payout_frequency {
            account.payout_frequency = payout_frequency;
        }
        if let Some(firm_id) = self.firm_id {
            account.firm_id = firm_id;
        }
        if let Some(default_weight) = self.default_weight {
            account.default_weight = default_weight;
        }
    }
}

fn validate_profit_split(profit_split: Option<f64>) -> Result<()> {
    match profit_split {
        Some(split) if !(0.0..=1.0).contains(&split) => Err(Error::Validation(
            ValidationError::InvalidInput(format!(
                "Profit split must be between 0 and 1, got {}",
                split
            )),
        )),
        _ => Ok(()),
    }
}

fn validate_weight(weight: Option<f64>) -> Result<()> {
    match weight {
        Some(w) if !w.is_finite() || w < 0.0 => Err(Error::Validation(
            ValidationError::InvalidInput(format!("Weight must be a non-negative number, got {}", w)),
        )),
        _ => Ok(()),
    }
}
