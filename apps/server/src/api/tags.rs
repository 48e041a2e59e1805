use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use propdesk_core::tags::{NewTag, Tag, TagServiceTrait, TagUpdate};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn list_tags(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(state.tag_service.list_tags()?))
}

async fn create_tag(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewTag>,
) -> ApiResult<Json<Tag>> {
    Ok(Json(state.tag_service.create_tag(payload).await?))
}

async fn update_tag(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<TagUpdate>,
) -> ApiResult<Json<Tag>> {
    payload.id = id.clone();
    state
        .tag_service
        .update_tag(payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Tag", &id))
}

async fn delete_tag(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    if state.tag_service.delete_tag(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Tag", &id))
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/{id}", put(update_tag).delete(delete_tag))
}
