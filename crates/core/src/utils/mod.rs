pub mod double_option;
pub mod time_utils;

use uuid::Uuid;

/// The caller-supplied id when non-blank, otherwise a fresh v4 UUID.
pub fn record_id(requested: Option<String>) -> String {
    requested
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
