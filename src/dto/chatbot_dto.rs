use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChatbotRequest {
    #[validate(length(max = 1000, message = "Message is too long"))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatbotResponse {
    pub reply: &'static str,
    pub matched: bool,
}
