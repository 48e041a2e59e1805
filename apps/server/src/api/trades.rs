use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use propdesk_core::trades::{NewTrade, Trade, TradeServiceTrait};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::TradeListQuery,
};

async fn list_trades(
    Query(query): Query<TradeListQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Trade>>> {
    let trades = match query.account_id.as_deref() {
        Some(account_id) => state.trade_service.list_trades_for_account(account_id)?,
        None => state.trade_service.list_trades()?,
    };
    Ok(Json(trades))
}

async fn get_trade(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Trade>> {
    Ok(Json(state.trade_service.get_trade(&id)?))
}

async fn create_trade(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewTrade>,
) -> ApiResult<Json<Trade>> {
    Ok(Json(state.trade_service.create_trade(payload).await?))
}

async fn update_trade(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut trade): Json<Trade>,
) -> ApiResult<Json<Trade>> {
    trade.id = id;
    Ok(Json(state.trade_service.update_trade(trade).await?))
}

async fn delete_trade(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    if state.trade_service.delete_trade(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Trade", &id))
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trades", get(list_trades).post(create_trade))
        .route(
            "/trades/{id}",
            get(get_trade).put(update_trade).delete(delete_trade),
        )
}
