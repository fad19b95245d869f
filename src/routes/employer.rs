use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::application_dto::{
        ApplicantsQuery, ApplicationResponse, ApplicationSummary, UpdateStatusPayload,
    },
    dto::job_dto::{CreateJobPayload, JobStatusPayload, UpdateJobPayload},
    error::Result,
    middleware::auth::CurrentUser,
    services::export_service::ExportService,
    AppState,
};

#[axum::debug_handler]
pub async fn create_job(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.create(&user, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

#[axum::debug_handler]
pub async fn my_jobs(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let jobs = state.job_service.employer_jobs(&user).await?;
    Ok(Json(jobs))
}

#[axum::debug_handler]
pub async fn update_job(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let job = state.job_service.update(&user, id, payload.into()).await?;
    Ok(Json(job))
}

#[axum::debug_handler]
pub async fn set_job_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<JobStatusPayload>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.set_status(&user, id, payload.status).await?;
    Ok(Json(job))
}

/// Closing is the delete: listings are never purged.
#[axum::debug_handler]
pub async fn close_job(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.close(&user, id).await?;
    Ok(Json(job))
}

#[axum::debug_handler]
pub async fn list_applicants(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ApplicantsQuery>,
) -> Result<impl IntoResponse> {
    let (filter, sort) = query.into_parts();
    let applicants = state
        .application_service
        .applicants(&user, &filter, sort)
        .await?;
    let body: Vec<ApplicationResponse> = applicants.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn export_applicants(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ApplicantsQuery>,
) -> Result<impl IntoResponse> {
    let (filter, sort) = query.into_parts();
    let applicants = state
        .application_service
        .applicants(&user, &filter, sort)
        .await?;
    let buffer = ExportService::generate_applicants_xlsx(&applicants)?;
    tracing::info!(employer_id = %user.id, rows = applicants.len(), "applicants exported");

    let filename = format!("applicants_{}.xlsx", chrono::Utc::now().format("%Y%m%d"));
    let disposition = format!("attachment; filename=\"{}\"", filename);
    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        buffer,
    ))
}

#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state
        .application_service
        .update_status(&user, id, payload.into())
        .await?;
    Ok(Json(ApplicationSummary::from(application)))
}
