use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use propdesk_core::store::Document;

use crate::{error::ApiResult, main_lib::AppState};

/// The whole document, as it would be backed up.
async fn export_document(State(state): State<Arc<AppState>>) -> Json<Document> {
    Json(Document::clone(&state.store.snapshot()))
}

/// Re-reads the persisted document after an external writer changed it.
async fn reload_document(State(state): State<Arc<AppState>>) -> ApiResult<Json<Document>> {
    let document = state.store.reload().await?;
    Ok(Json(Document::clone(&document)))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/document", get(export_document))
        .route("/document/reload", post(reload_document))
}
