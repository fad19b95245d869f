use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use subtle::ConstantTimeEq;
use validator::Validate;

use crate::{
    dto::payment_dto::{InitiatePaymentPayload, PaymentCallbackPayload},
    error::{Error, Result},
    middleware::auth::CurrentUser,
    AppState,
};

#[axum::debug_handler]
pub async fn list_plans(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.payment_service.plans())
}

#[axum::debug_handler]
pub async fn initiate(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<InitiatePaymentPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let payment = state
        .payment_service
        .initiate(user.id, &payload.plan_id, &payload.phone)
        .await?;
    Ok((StatusCode::CREATED, Json(payment)))
}

#[axum::debug_handler]
pub async fn history(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse> {
    let payments = state.payment_service.history(user.id).await?;
    Ok(Json(payments))
}

#[axum::debug_handler]
pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PaymentCallbackPayload>,
) -> Result<impl IntoResponse> {
    verify_secret(&headers, &state.settings.webhook_secret)?;
    payload.validate()?;
    if let Some(desc) = &payload.result_desc {
        tracing::debug!(reference = %payload.reference, code = payload.result_code, desc = %desc, "payment callback");
    }
    let payment = state
        .payment_service
        .settle(&payload.reference, payload.succeeded())
        .await?;
    Ok(Json(payment))
}

fn verify_secret(headers: &HeaderMap, expected: &str) -> Result<()> {
    let Some(secret_hdr) = headers.get("x-webhook-secret") else {
        return Err(Error::Unauthorized("missing_webhook_secret".into()));
    };
    let provided = secret_hdr
        .to_str()
        .map_err(|_| Error::Unauthorized("invalid_secret_header".into()))?;
    if ConstantTimeEq::ct_eq(provided.as_bytes(), expected.as_bytes()).into() {
        Ok(())
    } else {
        Err(Error::Unauthorized("invalid_webhook_secret".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_secret_must_match_exactly() {
        let mut headers = HeaderMap::new();
        assert!(verify_secret(&headers, "s3cret").is_err());
        headers.insert("x-webhook-secret", "s3cret".parse().unwrap());
        assert!(verify_secret(&headers, "s3cret").is_ok());
        assert!(verify_secret(&headers, "s3cret2").is_err());
    }
}
