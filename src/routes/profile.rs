use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use bytes::Bytes;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::profile_dto::{ProfileResponse, UpdateProfilePayload},
    error::{Error, Result},
    middleware::auth::CurrentUser,
    AppState,
};

#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let profile = state.profile_service.current(&user).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[axum::debug_handler]
pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let profile = state.profile_service.update(&user, payload.into()).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// Public view of another user, e.g. an employer's company page.
#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let profile = state.profile_service.get(id).await?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// First `file` part of the form with its declared content type.
async fn read_file(multipart: &mut Multipart, max_bytes: usize) -> Result<(String, Bytes)> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_default();
        let data = field.bytes().await?;
        if data.len() > max_bytes {
            return Err(Error::BadRequest(format!(
                "File exceeds the {} byte limit",
                max_bytes
            )));
        }
        return Ok((content_type, data));
    }
    Err(Error::BadRequest("Missing 'file' field".into()))
}

#[axum::debug_handler]
pub async fn upload_resume(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let (content_type, data) = read_file(&mut multipart, state.settings.max_upload_bytes).await?;
    let profile = state
        .profile_service
        .upload_resume(&user, &content_type, data)
        .await?;
    Ok(Json(ProfileResponse::from(profile)))
}

#[axum::debug_handler]
pub async fn upload_photo(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let (content_type, data) = read_file(&mut multipart, state.settings.max_upload_bytes).await?;
    let profile = state
        .profile_service
        .upload_photo(&user, &content_type, data)
        .await?;
    Ok(Json(ProfileResponse::from(profile)))
}

/// Revokes the presented token for the rest of its lifetime.
#[axum::debug_handler]
pub async fn sign_out(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    state.sessions.revoke(&user.token, user.expires_at);
    tracing::info!(user_id = %user.id, "signed out");
    StatusCode::NO_CONTENT
}
