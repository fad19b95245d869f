use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Datelike;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::calendar_dto::{CreateEventPayload, MonthQuery},
    error::Result,
    middleware::auth::CurrentUser,
    utils::time::today_in_kenya,
    AppState,
};

#[axum::debug_handler]
pub async fn month(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<MonthQuery>,
) -> Result<impl IntoResponse> {
    query.validate()?;
    let today = today_in_kenya();
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());
    let view = state.calendar_service.month(user.id, year, month).await?;
    Ok(Json(view))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpcomingQuery {
    pub days: Option<i64>,
}

#[axum::debug_handler]
pub async fn upcoming(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<UpcomingQuery>,
) -> Result<impl IntoResponse> {
    let days = query.days.unwrap_or(14).clamp(0, 366);
    let events = state.calendar_service.upcoming(user.id, days).await?;
    Ok(Json(events))
}

#[axum::debug_handler]
pub async fn create_event(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateEventPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let event = state
        .calendar_service
        .create(payload.into_event(user.id))
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[axum::debug_handler]
pub async fn delete_event(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.calendar_service.delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
