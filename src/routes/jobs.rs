use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::application_dto::{ApplicationSummary, ApplyPayload},
    dto::job_dto::{JobDetailResponse, JobListQuery},
    error::Result,
    middleware::auth::CurrentUser,
    AppState,
};

/// Active listings, filtered and sorted.
#[axum::debug_handler]
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let (filter, sort) = query.into_parts();
    let jobs = state.job_service.browse(&filter, sort).await?;
    Ok(Json(jobs))
}

#[axum::debug_handler]
pub async fn jobs_map(
    State(state): State<AppState>,
    Query(query): Query<JobListQuery>,
) -> Result<impl IntoResponse> {
    let (filter, _) = query.into_parts();
    let clusters = state.job_service.map(&filter).await?;
    Ok(Json(clusters))
}

#[axum::debug_handler]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get_public(id).await?;
    Ok(Json(JobDetailResponse { job, is_saved: None }))
}

/// Listing as seen by a signed-in user, with their bookmark state.
#[axum::debug_handler]
pub async fn get_job_for_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.get_public(id).await?;
    let is_saved = state.saved_job_service.is_saved(user.id, id).await?;
    Ok(Json(JobDetailResponse {
        job,
        is_saved: Some(is_saved),
    }))
}

#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let resume_url = match payload.resume_url {
        Some(url) => Some(url),
        None => state.profile_service.current(&user).await?.resume_url,
    };
    let application = state
        .application_service
        .apply(&user, id, payload.cover_letter, resume_url)
        .await?;
    Ok((StatusCode::CREATED, Json(ApplicationSummary::from(application))))
}
