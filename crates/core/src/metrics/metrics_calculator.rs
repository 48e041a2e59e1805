//! Metric calculator.
//!
//! Computes one named metric over the trades (or payouts) that fall inside a
//! rolling period and, optionally, touch a set of linked accounts. All
//! computations are pure scans over borrowed slices.

use chrono::{DateTime, Utc};

use super::metrics_model::{is_in_period, progress_percent, MetricConfig, MetricType, MetricValue};
use crate::accounts::Account;
use crate::payouts::Payout;
use crate::store::Document;
use crate::trades::Trade;
use crate::utils::time_utils::count_distinct_days;

/// Borrowed view of the records a metric reads, anchored at one instant.
#[derive(Debug, Clone, Copy)]
pub struct MetricCalculator<'a> {
    trades: &'a [Trade],
    accounts: &'a [Account],
    payouts: &'a [Payout],
    now: DateTime<Utc>,
}

impl<'a> MetricCalculator<'a> {
    pub fn new(
        trades: &'a [Trade],
        accounts: &'a [Account],
        payouts: &'a [Payout],
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            trades,
            accounts,
            payouts,
            now,
        }
    }

    pub fn from_document(document: &'a Document, now: DateTime<Utc>) -> Self {
        Self::new(&document.trades, &document.accounts, &document.payouts, now)
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Trades whose effective date is in period and that touch a linked account.
    pub fn filtered_trades(&self, config: &MetricConfig) -> Vec<&'a Trade> {
        self.trades
            .iter()
            .filter(|t| is_in_period(t.effective_date(), config.period, config.start_date, self.now))
            .filter(|t| {
                config.linked_accounts.is_empty()
                    || config
                        .linked_accounts
                        .iter()
                        .any(|account_id| t.involves_account(account_id))
            })
            .collect()
    }

    /// Effective payouts in period that pay at least one linked account.
    pub fn filtered_payouts(&self, config: &MetricConfig) -> Vec<&'a Payout> {
        self.payouts
            .iter()
            .filter(|p| p.status.is_effective())
            .filter(|p| is_in_period(p.date_created, config.period, config.start_date, self.now))
            .filter(|p| {
                config.linked_accounts.is_empty()
                    || p.account_ids
                        .iter()
                        .any(|id| config.linked_accounts.contains(id))
            })
            .collect()
    }

    /// Distinct calendar days with at least one in-period trade.
    pub fn days_active(&self, config: &MetricConfig) -> u32 {
        count_distinct_days(self.filtered_trades(config).iter().map(|t| t.effective_date()))
    }

    /// Evaluates `metric_type` under `config`.
    pub fn calculate(&self, metric_type: MetricType, config: &MetricConfig) -> MetricValue {
        match metric_type {
            MetricType::Profit => {
                let total_profit = self.total_profit(config);
                MetricValue::Progress {
                    current_value: total_profit,
                    progress: progress_percent(total_profit, config.target_value),
                }
            }
            MetricType::Roi => MetricValue::Simple {
                value: self.roi(config),
            },
            MetricType::Payout => MetricValue::Simple {
                value: self.payout_total(config),
            },
            MetricType::TradeCount => MetricValue::Simple {
                value: self.filtered_trades(config).len() as f64,
            },
            MetricType::WinRate => MetricValue::Simple {
                value: self.win_rate(config),
            },
            MetricType::AvgR => MetricValue::Simple {
                value: self.average_r(config),
            },
        }
    }

    fn total_profit(&self, config: &MetricConfig) -> f64 {
        self.filtered_trades(config).iter().map(|t| t.result_net).sum()
    }

    /// Profit over the initial funding of the linked accounts (all when none
    /// are linked). A zero baseline yields 0.
    fn roi(&self, config: &MetricConfig) -> f64 {
        let baseline: f64 = self
            .accounts
            .iter()
            .filter(|a| config.linked_accounts.is_empty() || config.linked_accounts.contains(&a.id))
            .map(|a| a.initial_funding)
            .sum();
        if baseline <= 0.0 {
            return 0.0;
        }
        self.total_profit(config) / baseline * 100.0
    }

    fn payout_total(&self, config: &MetricConfig) -> f64 {
        self.filtered_payouts(config)
            .iter()
            .map(|p| p.net_for_accounts(&config.linked_accounts))
            .sum()
    }

    fn win_rate(&self, config: &MetricConfig) -> f64 {
        let trades = self.filtered_trades(config);
        if trades.is_empty() {
            return 0.0;
        }
        let wins = trades.iter().filter(|t| t.result_r > 0.0).count();
        wins as f64 / trades.len() as f64 * 100.0
    }

    fn average_r(&self, config: &MetricConfig) -> f64 {
        let trades = self.filtered_trades(config);
        if trades.is_empty() {
            return 0.0;
        }
        trades.iter().map(|t| t.result_r).sum::<f64>() / trades.len() as f64
    }
}
