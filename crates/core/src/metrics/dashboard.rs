//! Dashboard summary: every metric for one period in a single pass.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::metrics_calculator::MetricCalculator;
use super::metrics_model::{MetricConfig, MetricType, Period};
use crate::accounts::Account;
use crate::utils::time_utils::{calendar_day, get_days_between};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProfit {
    pub date: NaiveDate,
    pub profit: f64,
    pub trade_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub period: Period,
    pub profit: f64,
    pub roi: f64,
    pub payout_total: f64,
    pub trade_count: u32,
    pub win_rate: f64,
    pub avg_r: f64,
    /// Sum of current balances of the linked accounts (all when none linked).
    pub total_funding: f64,
    /// One entry per calendar day of the window, oldest first.
    pub daily_profit: Vec<DailyProfit>,
}

/// Builds the dashboard summary.
pub fn summarize(
    calculator: &MetricCalculator<'_>,
    accounts: &[Account],
    period: Period,
    start_date: DateTime<Utc>,
    linked_accounts: Vec<String>,
) -> DashboardSummary {
    let config = MetricConfig {
        period,
        start_date,
        linked_accounts,
        target_value: 0.0,
    };

    let value = |metric_type: MetricType| calculator.calculate(metric_type, &config).current_value();

    let total_funding = accounts
        .iter()
        .filter(|a| config.linked_accounts.is_empty() || config.linked_accounts.contains(&a.id))
        .map(|a| a.current_funding)
        .sum();

    DashboardSummary {
        period,
        profit: value(MetricType::Profit),
        roi: value(MetricType::Roi),
        payout_total: value(MetricType::Payout),
        trade_count: value(MetricType::TradeCount) as u32,
        win_rate: value(MetricType::WinRate),
        avg_r: value(MetricType::AvgR),
        total_funding,
        daily_profit: daily_profit(calculator, &config),
    }
}

/// Profit per calendar day over the window. For `AllTime` the series starts
/// at the first in-period trade instead of the configured start date.
fn daily_profit(calculator: &MetricCalculator<'_>, config: &MetricConfig) -> Vec<DailyProfit> {
    let trades = calculator.filtered_trades(config);
    let mut by_day: BTreeMap<NaiveDate, (f64, u32)> = BTreeMap::new();
    for trade in &trades {
        let entry = by_day.entry(calendar_day(trade.effective_date())).or_insert((0.0, 0));
        entry.0 += trade.result_net;
        entry.1 += 1;
    }

    let first_day = match config.period {
        Period::AllTime => match by_day.keys().next() {
            Some(day) => *day,
            None => return Vec::new(),
        },
        period => calendar_day(period.lower_bound(config.start_date, calculator.now())),
    };
    let last_day = calendar_day(calculator.now());

    get_days_between(first_day, last_day)
        .into_iter()
        .map(|date| {
            let (profit, trade_count) = by_day.get(&date).copied().unwrap_or((0.0, 0));
            DailyProfit {
                date,
                profit,
                trade_count,
            }
        })
        .collect()
}
