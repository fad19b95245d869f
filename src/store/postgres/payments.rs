use sqlx::PgPool;
use uuid::Uuid;

use crate::models::payment::{NewPayment, Payment, PaymentStatus};
use crate::store::{PaymentStore, StoreFuture};

#[derive(Clone)]
pub struct PgPaymentStore {
    pool: PgPool,
}

impl PgPaymentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PaymentStore for PgPaymentStore {
    fn insert(&self, payment: NewPayment) -> StoreFuture<Payment> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let created = sqlx::query_as::<_, Payment>(
                r#"
                INSERT INTO payments (user_id, plan_id, amount, phone, reference, status)
                VALUES ($1, $2, $3, $4, $5, 'pending')
                RETURNING *
                "#,
            )
            .bind(payment.user_id)
            .bind(&payment.plan_id)
            .bind(payment.amount)
            .bind(&payment.phone)
            .bind(&payment.reference)
            .fetch_one(&pool)
            .await?;
            Ok(created)
        })
    }

    fn list(&self, user_id: Uuid) -> StoreFuture<Vec<Payment>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let items = sqlx::query_as::<_, Payment>(
                "SELECT * FROM payments WHERE user_id = $1 ORDER BY created_at DESC",
            )
            .bind(user_id)
            .fetch_all(&pool)
            .await?;
            Ok(items)
        })
    }

    fn find_by_reference(&self, reference: String) -> StoreFuture<Option<Payment>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE reference = $1")
                .bind(&reference)
                .fetch_optional(&pool)
                .await?;
            Ok(payment)
        })
    }

    fn settle_pending(&self, id: Uuid, status: PaymentStatus) -> StoreFuture<Option<Payment>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let payment = sqlx::query_as::<_, Payment>(
                r#"
                UPDATE payments SET status = $2, updated_at = NOW()
                WHERE id = $1 AND status = 'pending'
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&pool)
            .await?;
            Ok(payment)
        })
    }
}
