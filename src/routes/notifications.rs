use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Extension, Json,
};
use futures::{Stream, StreamExt};
use uuid::Uuid;

use crate::{
    dto::message_dto::{MarkedResponse, NotificationListQuery, UnreadCountResponse},
    error::Result,
    middleware::auth::CurrentUser,
    routes::messages::to_sse,
    AppState,
};

#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<NotificationListQuery>,
) -> Result<impl IntoResponse> {
    let items = state
        .notification_service
        .list(user.id, query.limit)
        .await?;
    Ok(Json(items))
}

#[axum::debug_handler]
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let unread = state.notification_service.unread_count(user.id).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.notification_service.mark_read(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let updated = state.notification_service.mark_all_read(user.id).await?;
    Ok(Json(MarkedResponse { updated }))
}

pub async fn stream(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let events = state
        .notification_service
        .subscribe(user.id)
        .into_stream()
        .map(|event| Ok::<_, Infallible>(to_sse(event)));
    Sse::new(events).keep_alive(KeepAlive::default())
}
