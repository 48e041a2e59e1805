use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use propdesk_core::firms::{Firm, FirmServiceTrait, FirmUpdate, NewFirm};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn list_firms(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Firm>>> {
    Ok(Json(state.firm_service.list_firms()?))
}

async fn get_firm(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Firm>> {
    Ok(Json(state.firm_service.get_firm(&id)?))
}

async fn create_firm(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewFirm>,
) -> ApiResult<Json<Firm>> {
    Ok(Json(state.firm_service.create_firm(payload).await?))
}

async fn update_firm(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<FirmUpdate>,
) -> ApiResult<Json<Firm>> {
    payload.id = id.clone();
    state
        .firm_service
        .update_firm(payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Firm", &id))
}

async fn delete_firm(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    if state.firm_service.delete_firm(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Firm", &id))
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/firms", get(list_firms).post(create_firm))
        .route(
            "/firms/{id}",
            get(get_firm).put(update_firm).delete(delete_firm),
        )
}
