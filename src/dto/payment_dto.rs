use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_kenyan_phone;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InitiatePaymentPayload {
    #[validate(length(min = 1))]
    pub plan_id: String,
    #[validate(custom(function = "validate_kenyan_phone"))]
    pub phone: String,
}

/// Settlement notice posted by the mobile-money provider. A zero result
/// code means the customer confirmed the payment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentCallbackPayload {
    #[validate(length(min = 1))]
    pub reference: String,
    pub result_code: i32,
    pub result_desc: Option<String>,
}

impl PaymentCallbackPayload {
    pub fn succeeded(&self) -> bool {
        self.result_code == 0
    }
}
