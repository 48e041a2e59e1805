use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupReceipt {
    pub name: String,
    pub revision: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Collection sizes of a restored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreSummary {
    pub accounts: usize,
    pub trades: usize,
    pub payouts: usize,
    pub goals: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum RestoreOutcome {
    Restored(RestoreSummary),
    /// No backup exists under the configured name.
    NotFound,
}
