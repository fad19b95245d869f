use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Extension, Json,
};
use futures::{Stream, StreamExt};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::message_dto::{SendMessagePayload, UnreadCountResponse},
    error::Result,
    middleware::auth::CurrentUser,
    realtime::ChangeEvent,
    AppState,
};

/// Serialises feed events for an event-stream response.
pub(crate) fn to_sse(event: ChangeEvent) -> Event {
    let name = match &event {
        ChangeEvent::Messages(_) => "message",
        ChangeEvent::Notifications(_) => "notification",
    };
    Event::default()
        .event(name)
        .json_data(&event)
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to encode change event");
            Event::default().event("error")
        })
}

#[axum::debug_handler]
pub async fn contacts(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    // the contact list degrades to empty rather than failing the page
    let contacts = state
        .message_service
        .contacts(user.id)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, user_id = %user.id, "failed to load contacts");
            Vec::new()
        });
    Json(contacts)
}

#[axum::debug_handler]
pub async fn conversation(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(contact_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let messages = state
        .message_service
        .conversation(user.id, contact_id)
        .await?;
    Ok(Json(messages))
}

#[axum::debug_handler]
pub async fn send_message(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<SendMessagePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let message = state
        .message_service
        .send(user.id, payload.receiver_id, &payload.content)
        .await?;
    Ok((StatusCode::CREATED, Json(message)))
}

#[axum::debug_handler]
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let unread = state.message_service.unread_count(user.id).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

/// Live messages between the caller and `contact_id`. Closing the
/// connection drops the subscription.
pub async fn stream(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(contact_id): Path<Uuid>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    tracing::debug!(user_id = %user.id, %contact_id, "conversation stream opened");
    let events = state
        .message_service
        .subscribe(user.id, contact_id)
        .into_stream()
        .map(|event| Ok::<_, Infallible>(to_sse(event)));
    Sse::new(events).keep_alive(KeepAlive::default())
}
