use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use propdesk_core::settings::{Settings, SettingsServiceTrait, SettingsUpdate};

use crate::{error::ApiResult, main_lib::AppState};

async fn get_settings(State(state): State<Arc<AppState>>) -> ApiResult<Json<Settings>> {
    Ok(Json(state.settings_service.get_settings()?))
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SettingsUpdate>,
) -> ApiResult<Json<Settings>> {
    Ok(Json(state.settings_service.update_settings(payload).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/settings", get(get_settings).put(update_settings))
}
