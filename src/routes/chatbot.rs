use axum::{response::IntoResponse, Json};
use validator::Validate;

use crate::{
    dto::chatbot_dto::{ChatbotRequest, ChatbotResponse},
    error::Result,
    services::chatbot_service,
};

#[axum::debug_handler]
pub async fn ask(Json(payload): Json<ChatbotRequest>) -> Result<impl IntoResponse> {
    payload.validate()?;
    let matched = chatbot_service::match_rule(&payload.message);
    tracing::debug!(rule = ?matched, "chatbot reply selected");
    Ok(Json(ChatbotResponse {
        reply: chatbot_service::respond(&payload.message),
        matched: matched.is_some(),
    }))
}
