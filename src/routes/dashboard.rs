use axum::{extract::State, response::IntoResponse, Extension, Json};

use crate::{middleware::auth::CurrentUser, AppState};

#[axum::debug_handler]
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    Json(state.dashboard_service.for_user(&user).await)
}
