use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use propdesk_core::payouts::{NewPayout, Payout, PayoutServiceTrait, PayoutUpdate, SplitResult};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::SplitPreviewRequest,
};

async fn list_payouts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Payout>>> {
    Ok(Json(state.payout_service.list_payouts()?))
}

async fn get_payout(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Payout>> {
    Ok(Json(state.payout_service.get_payout(&id)?))
}

async fn create_payout(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewPayout>,
) -> ApiResult<Json<Payout>> {
    Ok(Json(state.payout_service.create_payout(payload).await?))
}

async fn update_payout(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<PayoutUpdate>,
) -> ApiResult<Json<Payout>> {
    payload.id = id.clone();
    state
        .payout_service
        .update_payout(payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Payout", &id))
}

async fn delete_payout(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    if state.payout_service.delete_payout(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Payout", &id))
    }
}

/// Computes a split without saving anything.
async fn preview_split(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SplitPreviewRequest>,
) -> ApiResult<Json<SplitResult>> {
    let split = state
        .payout_service
        .preview_split(request.amount, &request.account_ids)?;
    Ok(Json(split))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/payouts", get(list_payouts).post(create_payout))
        .route("/payouts/preview", post(preview_split))
        .route(
            "/payouts/{id}",
            get(get_payout).put(update_payout).delete(delete_payout),
        )
}
