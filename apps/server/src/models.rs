//! Request and response bodies that have no counterpart in the core crate.

use chrono::{DateTime, Utc};
use propdesk_core::metrics::{MetricConfig, MetricType, Period};
use serde::{Deserialize, Serialize};

/// Splits a comma-separated id list, dropping blanks.
pub fn parse_id_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    pub period: Option<Period>,
    pub start_date: Option<DateTime<Utc>>,
    /// Comma-separated account ids; all accounts when absent.
    pub accounts: Option<String>,
}

impl DashboardQuery {
    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn linked_accounts(&self) -> Vec<String> {
        parse_id_list(self.accounts.as_deref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRequest {
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    #[serde(flatten)]
    pub config: MetricConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResponse {
    pub current_value: f64,
    pub progress: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitPreviewRequest {
    pub amount: f64,
    #[serde(default)]
    pub account_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveRequest {
    pub archived: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeListQuery {
    pub account_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupStatus {
    pub dirty: bool,
    pub revision: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionSyncResponse {
    pub completed_goal_ids: Vec<String>,
}
