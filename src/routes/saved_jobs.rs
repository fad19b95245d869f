use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::{error::Result, middleware::auth::CurrentUser, AppState};

#[axum::debug_handler]
pub async fn list_saved(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let jobs = state.saved_job_service.list(user.id).await?;
    Ok(Json(jobs))
}

#[axum::debug_handler]
pub async fn toggle_saved(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let saved = state.saved_job_service.toggle(user.id, job_id).await?;
    Ok(Json(json!({
        "job_id": job_id,
        "state": saved,
        "saved": saved.is_saved(),
    })))
}
