use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use propdesk_core::backup::{BackupReceipt, BackupServiceTrait, RestoreOutcome};

use crate::{error::ApiResult, main_lib::AppState, models::BackupStatus};

async fn backup_now(State(state): State<Arc<AppState>>) -> ApiResult<Json<BackupReceipt>> {
    Ok(Json(state.backup_service.backup_now().await?))
}

/// Replaces the local document with the latest backup, if any.
async fn restore_latest(State(state): State<Arc<AppState>>) -> ApiResult<Json<RestoreOutcome>> {
    Ok(Json(state.backup_service.restore_latest().await?))
}

async fn backup_status(State(state): State<Arc<AppState>>) -> Json<BackupStatus> {
    Json(BackupStatus {
        dirty: state.backup_service.is_dirty(),
        revision: state.store.revision(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/backup", post(backup_now))
        .route("/backup/restore", post(restore_latest))
        .route("/backup/status", get(backup_status))
}
