use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use propdesk_core::goals::{Goal, GoalProgress, GoalServiceTrait, NewGoal};

use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{ArchiveRequest, CompletionSyncResponse},
};

async fn get_goals(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Goal>>> {
    Ok(Json(state.goal_service.get_goals()?))
}

async fn get_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Goal>> {
    Ok(Json(state.goal_service.get_goal(&id)?))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Json(goal): Json<NewGoal>,
) -> ApiResult<Json<Goal>> {
    Ok(Json(state.goal_service.create_goal(goal).await?))
}

async fn update_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(mut goal): Json<Goal>,
) -> ApiResult<Json<Goal>> {
    goal.id = id;
    Ok(Json(state.goal_service.update_goal(goal).await?))
}

/// Deletes a goal, or the sub-goal with that id when no goal matches.
async fn delete_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.goal_service.delete_goal(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn archive_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ArchiveRequest>,
) -> ApiResult<Json<Goal>> {
    Ok(Json(
        state.goal_service.archive_goal(&id, request.archived).await?,
    ))
}

async fn get_goal_progress(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<GoalProgress>> {
    Ok(Json(state.goal_service.get_goal_progress(&id)?))
}

async fn get_all_progress(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<GoalProgress>>> {
    Ok(Json(state.goal_service.get_all_progress()?))
}

async fn sync_completions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<CompletionSyncResponse>> {
    let completed_goal_ids = state.goal_service.sync_completions().await?;
    Ok(Json(CompletionSyncResponse { completed_goal_ids }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(get_goals).post(create_goal))
        .route("/goals/progress", get(get_all_progress))
        .route("/goals/sync-completions", post(sync_completions))
        .route(
            "/goals/{id}",
            get(get_goal).put(update_goal).delete(delete_goal),
        )
        .route("/goals/{id}/progress", get(get_goal_progress))
        .route("/goals/{id}/archive", put(archive_goal))
}
