use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use propdesk_core::metrics::{summarize, DashboardSummary, MetricCalculator};

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{DashboardQuery, MetricRequest, MetricResponse},
};

async fn get_dashboard(
    Query(query): Query<DashboardQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DashboardSummary>> {
    let document = state.store.snapshot();
    let calculator = MetricCalculator::from_document(&document, Utc::now());
    Ok(Json(summarize(
        &calculator,
        &document.accounts,
        query.period.unwrap_or_default(),
        query.start_date(),
        query.linked_accounts(),
    )))
}

/// Evaluates one metric under an explicit configuration.
async fn calculate_metric(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MetricRequest>,
) -> ApiResult<Json<MetricResponse>> {
    let document = state.store.snapshot();
    let calculator = MetricCalculator::from_document(&document, Utc::now());
    let value = calculator.calculate(request.metric_type, &request.config);
    Ok(Json(MetricResponse {
        current_value: value.current_value(),
        progress: value.progress(request.config.target_value),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/metrics", post(calculate_metric))
}
