//! Trade domain models.
//!
//! Field names follow the persisted document, which mixes snake_case trade
//! fields with camelCase references (`accountId`, `strategyId`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::accounts::DEFAULT_ACCOUNT_WEIGHT;
use crate::errors::{Error, Result, ValidationError};

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    Long,
    Short,
}

impl Direction {
    /// +1 for longs, -1 for shorts.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

fn default_weight() -> f64 {
    DEFAULT_ACCOUNT_WEIGHT
}

/// An account a trade's P&L is attributed to, with its share.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeAccount {
    #[serde(rename = "accountId")]
    pub account_id: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl TradeAccount {
    pub fn new(account_id: impl Into<String>, weight: f64) -> Self {
        Self {
            account_id: account_id.into(),
            weight,
        }
    }
}

/// A single fill (or scale-in/scale-out leg) of a trade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PartialExecution {
    #[serde(rename = "entryPrice", default)]
    pub entry_price: f64,
    #[serde(rename = "exitPrice", default)]
    pub exit_price: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub result_gross: f64,
    #[serde(rename = "result_R", default)]
    pub result_r: f64,
    pub entry_datetime: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_datetime: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
}

/// Domain model representing a trade.
///
/// When `partial_executions` is non-empty, volume, prices and results are
/// derived from it (see [`super::calculations`]); otherwise the stored values
/// are authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub id: String,
    pub entry_datetime: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub asset: String,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub entry_price: f64,
    #[serde(default)]
    pub exit_price: f64,
    #[serde(rename = "strategyId", default, skip_serializing_if = "Option::is_none")]
    pub strategy_id: Option<String>,
    #[serde(default)]
    pub accounts: Vec<TradeAccount>,
    /// Primary account, derived from the first `accounts` entry.
    #[serde(rename = "accountId", default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub result_gross: f64,
    #[serde(default)]
    pub commission: f64,
    #[serde(default)]
    pub fees: f64,
    #[serde(default)]
    pub swap: f64,
    #[serde(default)]
    pub slippage: f64,
    #[serde(default)]
    pub result_net: f64,
    #[serde(rename = "result_R", default)]
    pub result_r: f64,
    #[serde(rename = "PartialExecutions", default)]
    pub partial_executions: Vec<PartialExecution>,
    #[serde(rename = "checklistResults", default, skip_serializing_if = "Value::is_null")]
    pub checklist_results: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Trade {
    /// The instant the trade counts at for period filtering: the exit, or the
    /// entry while the trade is still open.
    pub fn effective_date(&self) -> DateTime<Utc> {
        self.exit_datetime.unwrap_or(self.entry_datetime)
    }

    /// Sum of commission, fees, swap and slippage.
    pub fn total_costs(&self) -> f64 {
        self.commission + self.fees + self.swap + self.slippage
    }

    /// Whether any attribution (primary or weighted) points at the account.
    pub fn involves_account(&self, account_id: &str) -> bool {
        self.account_id.as_deref() == Some(account_id)
            || self.accounts.iter().any(|a| a.account_id == account_id)
    }

    /// Account ids this trade moves funding for.
    pub fn account_ids(&self) -> Vec<String> {
        self.accounts.iter().map(|a| a.account_id.clone()).collect()
    }
}

/// Input model for creating a trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrade {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub entry_datetime: DateTime<Utc>,
    #[serde(default)]
    pub exit_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub asset: String,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub entry_price: f64,
    #[serde(default)]
    pub exit_price: f64,
    #[serde(rename = "strategyId", default)]
    pub strategy_id: Option<String>,
    #[serde(default)]
    pub accounts: Vec<TradeAccount>,
    #[serde(rename = "accountId", default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub result_gross: f64,
    #[serde(default)]
    pub commission: f64,
    #[serde(default)]
    pub fees: f64,
    #[serde(default)]
    pub swap: f64,
    #[serde(default)]
    pub slippage: f64,
    #[serde(default)]
    pub result_net: f64,
    #[serde(rename = "result_R", default)]
    pub result_r: f64,
    #[serde(rename = "PartialExecutions", default)]
    pub partial_executions: Vec<PartialExecution>,
    #[serde(rename = "checklistResults", default)]
    pub checklist_results: Value,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewTrade {
    /// Validates the new trade data.
    pub fn validate(&self) -> Result<()> {
        validate_attribution(&self.accounts)?;
        validate_executions(&self.partial_executions)?;
        if let Some(exit) = self.exit_datetime {
            if exit < self.entry_datetime {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Trade exit cannot be before its entry".to_string(),
                )));
            }
        }
        Ok(())
    }

    pub fn into_trade(self, id: String) -> Trade {
        Trade {
            id,
            entry_datetime: self.entry_datetime,
            exit_datetime: self.exit_datetime,
            asset: self.asset,
            direction: self.direction,
            volume: self.volume,
            entry_price: self.entry_price,
            exit_price: self.exit_price,
            strategy_id: self.strategy_id,
            accounts: self.accounts,
            account_id: self.account_id,
            result_gross: self.result_gross,
            commission: self.commission,
            fees: self.fees,
            swap: self.swap,
            slippage: self.slippage,
            result_net: self.result_net,
            result_r: self.result_r,
            partial_executions: self.partial_executions,
            checklist_results: self.checklist_results,
            notes: self.notes,
        }
    }
}

/// Validates an edited trade before it replaces the stored one.
pub fn validate_trade(trade: &Trade) -> Result<()> {
    if trade.id.trim().is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "id".to_string(),
        )));
    }
    validate_attribution(&trade.accounts)?;
    validate_executions(&trade.partial_executions)
}

fn validate_attribution(accounts: &[TradeAccount]) -> Result<()> {
    for entry in accounts {
        if entry.account_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "accountId".to_string(),
            )));
        }
        if !entry.weight.is_finite() || entry.weight < 0.0 {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Weight for account {} must be a non-negative number",
                entry.account_id
            ))));
        }
    }
    Ok(())
}

fn validate_executions(executions: &[PartialExecution]) -> Result<()> {
    if executions
        .iter()
        .any(|e| !e.volume.is_finite() || e.volume < 0.0)
    {
        return Err(Error::Validation(ValidationError::InvalidInput(
            "Execution volume must be a non-negative number".to_string(),
        )));
    }
    Ok(())
}
