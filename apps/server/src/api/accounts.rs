use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use propdesk_core::accounts::{Account, AccountServiceTrait, AccountUpdate, NewAccount};
use propdesk_core::funding::FundingReconciliation;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn list_accounts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Account>>> {
    Ok(Json(state.account_service.list_accounts()?))
}

async fn get_account(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Account>> {
    Ok(Json(state.account_service.get_account(&id)?))
}

async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewAccount>,
) -> ApiResult<Json<Account>> {
    let created = state.account_service.create_account(payload).await?;
    Ok(Json(created))
}

async fn update_account(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<AccountUpdate>,
) -> ApiResult<Json<Account>> {
    payload.id = id.clone();
    state
        .account_service
        .update_account(payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Account", &id))
}

async fn delete_account(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    if state.account_service.delete_account(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Account", &id))
    }
}

/// Rebuilds one account's balance from its full history.
async fn recalc_funding(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Account>> {
    state
        .account_service
        .recalc_account_funding(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Account", &id))
}

async fn reconcile_funding(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<FundingReconciliation>>> {
    Ok(Json(state.account_service.reconcile_funding()?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
        .route("/accounts/{id}/recalc-funding", post(recalc_funding))
        .route("/funding/reconcile", get(reconcile_funding))
}
