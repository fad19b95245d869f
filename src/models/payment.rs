use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

text_enum!(PaymentStatus {
    Pending => "pending",
    Completed => "completed",
    Failed => "failed",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: String,
    pub amount: Decimal,
    pub phone: String,
    pub reference: String,
    #[sqlx(try_from = "String")]
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub user_id: Uuid,
    pub plan_id: String,
    pub amount: Decimal,
    pub phone: String,
    pub reference: String,
}

/// Subscription tier offered on the payments page. Prices are in KES.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    pub price_kes: i64,
    pub period: &'static str,
    pub features: &'static [&'static str],
}

pub const PLANS: &[Plan] = &[
    Plan {
        id: "basic",
        name: "Basic",
        price_kes: 0,
        period: "month",
        features: &["3 active job posts", "Standard listing", "In-app messaging"],
    },
    Plan {
        id: "standard",
        name: "Standard",
        price_kes: 1_500,
        period: "month",
        features: &[
            "15 active job posts",
            "Urgent badge on listings",
            "Applicant export",
        ],
    },
    Plan {
        id: "premium",
        name: "Premium",
        price_kes: 4_500,
        period: "month",
        features: &[
            "Unlimited job posts",
            "Featured placement",
            "Priority support",
            "Applicant export",
        ],
    },
];

pub fn find_plan(id: &str) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
}
