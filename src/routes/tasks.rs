use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::task_dto::{CreateTaskPayload, TaskListQuery},
    error::Result,
    middleware::auth::CurrentUser,
    AppState,
};

#[axum::debug_handler]
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<TaskListQuery>,
) -> Result<impl IntoResponse> {
    let tasks = state
        .task_service
        .list(user.id, query.pending_only.unwrap_or(false))
        .await?;
    Ok(Json(tasks))
}

#[axum::debug_handler]
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateTaskPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let task = state.task_service.create(payload.into_task(user.id)).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

#[axum::debug_handler]
pub async fn toggle_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let task = state.task_service.toggle(user.id, id).await?;
    Ok(Json(task))
}

#[axum::debug_handler]
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.task_service.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
