//! Metrics module - period-filtered performance figures over trades and payouts.

mod dashboard;
mod metrics_calculator;
mod metrics_model;


pub use dashboard::{summarize, DailyProfit, DashboardSummary};
pub use metrics_calculator::MetricCalculator;
pub use metrics_model::{
    is_in_period, progress_percent, MetricConfig, MetricType, MetricValue, Period,
};
