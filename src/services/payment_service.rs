use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::notification::NotificationKind;
use crate::models::payment::{find_plan, NewPayment, Payment, PaymentStatus, Plan, PLANS};
use crate::services::notification_service::NotificationService;
use crate::store::PaymentStore;
use crate::utils::token::generate_reference;
use crate::utils::validation::normalize_kenyan_phone;

pub const REFERENCE_PREFIX: &str = "JSK";
const REFERENCE_LEN: usize = 9;

#[derive(Clone)]
pub struct PaymentService {
    store: Arc<dyn PaymentStore>,
    notifications: NotificationService,
}

impl PaymentService {
    pub fn new(store: Arc<dyn PaymentStore>, notifications: NotificationService) -> Self {
        Self {
            store,
            notifications,
        }
    }

    pub fn plans(&self) -> &'static [Plan] {
        PLANS
    }

    pub async fn initiate(&self, user_id: Uuid, plan_id: &str, phone: &str) -> Result<Payment> {
        let plan = find_plan(plan_id)
            .ok_or_else(|| Error::BadRequest(format!("Unknown plan: {}", plan_id)))?;
        if plan.price_kes == 0 {
            return Err(Error::BadRequest("The Basic plan is free".into()));
        }
        let phone = normalize_kenyan_phone(phone)
            .ok_or_else(|| Error::BadRequest("Enter a valid Safaricom number".into()))?;

        let payment = self
            .store
            .insert(NewPayment {
                user_id,
                plan_id: plan.id.to_string(),
                amount: Decimal::from(plan.price_kes),
                phone,
                reference: generate_reference(REFERENCE_PREFIX, REFERENCE_LEN),
            })
            .await?;
        tracing::info!(payment_id = %payment.id, reference = %payment.reference, plan = plan.id, "payment initiated");
        Ok(payment)
    }

    /// Provider callback: settles a pending payment. Repeated callbacks for an
    /// already settled payment are no-ops.
    pub async fn settle(&self, reference: &str, success: bool) -> Result<Payment> {
        let payment = self
            .store
            .find_by_reference(reference.to_string())
            .await?
            .ok_or_else(|| Error::NotFound("Payment not found".into()))?;
        if payment.status != PaymentStatus::Pending {
            tracing::warn!(reference, status = %payment.status, "duplicate payment callback ignored");
            return Ok(payment);
        }

        let status = if success {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Failed
        };
        // a concurrent callback may have settled it between the read and here
        let Some(updated) = self.store.settle_pending(payment.id, status).await? else {
            tracing::warn!(reference, "payment settled by a concurrent callback");
            return self
                .store
                .find_by_reference(reference.to_string())
                .await?
                .ok_or_else(|| Error::NotFound("Payment not found".into()));
        };
        tracing::info!(reference, status = %status, "payment settled");

        let plan_name = find_plan(&updated.plan_id).map(|p| p.name).unwrap_or("subscription");
        let (title, message) = if success {
            (
                "Payment received",
                format!("KES {} received for the {} plan. Ref {}", updated.amount, plan_name, updated.reference),
            )
        } else {
            (
                "Payment failed",
                format!("Your payment for the {} plan did not go through. Ref {}", plan_name, updated.reference),
            )
        };
        self.notifications
            .notify_quietly(updated.user_id, NotificationKind::Payment, title, message)
            .await;
        Ok(updated)
    }

    pub async fn history(&self, user_id: Uuid) -> Result<Vec<Payment>> {
        self.store.list(user_id).await
    }
}
