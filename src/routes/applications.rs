use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    dto::application_dto::{ApplicationResponse, MyApplicationsQuery},
    error::Result,
    middleware::auth::CurrentUser,
    AppState,
};

#[axum::debug_handler]
pub async fn my_applications(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<MyApplicationsQuery>,
) -> Result<impl IntoResponse> {
    let list = state
        .application_service
        .my_applications(&user, query.status)
        .await?;
    let body: Vec<ApplicationResponse> = list.into_iter().map(Into::into).collect();
    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state.application_service.get(&user, id).await?;
    Ok(Json(ApplicationResponse::from(detail)))
}
