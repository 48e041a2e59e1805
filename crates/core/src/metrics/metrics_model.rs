//! Metric domain models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_PROGRESS;

/// What a goal or dashboard tile measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum MetricType {
    /// Sum of trade net results.
    #[default]
    Profit,
    /// Profit as a percentage of the linked accounts' initial funding.
    Roi,
    /// Net payout received.
    Payout,
    TradeCount,
    /// Percentage of trades with a positive R-multiple.
    WinRate,
    /// Mean R-multiple.
    AvgR,
}

impl MetricType {
    pub const ALL: [MetricType; 6] = [
        MetricType::Profit,
        MetricType::Roi,
        MetricType::Payout,
        MetricType::TradeCount,
        MetricType::WinRate,
        MetricType::AvgR,
    ];
}

/// Time window a metric is evaluated over.
///
/// Everything except `AllTime` is a rolling window ending now, not a
/// calendar bucket: `Monthly` is the trailing 30 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
    #[default]
    AllTime,
}

impl Period {
    /// Length of the rolling window in days, `None` for `AllTime`.
    pub fn window_days(self) -> Option<i64> {
        match self {
            Period::Daily => Some(1),
            Period::Weekly => Some(7),
            Period::Monthly => Some(30),
            Period::Quarterly => Some(90),
            Period::Yearly => Some(365),
            Period::AllTime => None,
        }
    }

    /// Earliest instant the window admits, given the configured start date.
    pub fn lower_bound(self, start_date: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.window_days() {
            Some(days) => start_date.max(now - Duration::days(days)),
            None => start_date,
        }
    }
}

/// Whether `date` falls inside `period` anchored at `now`.
///
/// `date >= start_date` always applies; rolling periods additionally require
/// `date >= now - window`.
pub fn is_in_period(
    date: DateTime<Utc>,
    period: Period,
    start_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    date >= period.lower_bound(start_date, now)
}

/// Evaluation parameters for one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricConfig {
    #[serde(default)]
    pub period: Period,
    pub start_date: DateTime<Utc>,
    /// Empty means all accounts.
    #[serde(default)]
    pub linked_accounts: Vec<String>,
    #[serde(default)]
    pub target_value: f64,
}

/// Result of a metric evaluation.
///
/// Some metrics report their own progress against the target; the rest
/// return a bare value and the caller derives progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MetricValue {
    Simple { value: f64 },
    #[serde(rename_all = "camelCase")]
    Progress { current_value: f64, progress: f64 },
}

impl MetricValue {
    pub fn current_value(&self) -> f64 {
        match *self {
            MetricValue::Simple { value } => value,
            MetricValue::Progress { current_value, .. } => current_value,
        }
    }

    /// Progress percentage against `target_value`, already clamped to 0..=100.
    pub fn progress(&self, target_value: f64) -> f64 {
        match *self {
            MetricValue::Simple { value } => progress_percent(value, target_value),
            MetricValue::Progress { progress, .. } => progress.clamp(0.0, MAX_PROGRESS),
        }
    }
}

/// `current / target` as a percentage, clamped to 0..=100.
///
/// A non-positive target yields 0 rather than NaN or infinity.
pub fn progress_percent(current_value: f64, target_value: f64) -> f64 {
    if target_value.is_nan() || target_value <= 0.0 || !current_value.is_finite() {
        return 0.0;
    }
    (current_value / target_value * 100.0).clamp(0.0, MAX_PROGRESS)
}
