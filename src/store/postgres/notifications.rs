use sqlx::PgPool;
use uuid::Uuid;

use crate::models::notification::{NewNotification, Notification};
use crate::store::{NotificationStore, StoreFuture};

#[derive(Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl NotificationStore for PgNotificationStore {
    fn insert(&self, notification: NewNotification) -> StoreFuture<Notification> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let created = sqlx::query_as::<_, Notification>(
                r#"
                INSERT INTO notifications (user_id, title, message, kind)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(notification.user_id)
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.kind.as_str())
            .fetch_one(&pool)
            .await?;
            Ok(created)
        })
    }

    fn list(&self, user_id: Uuid, limit: i64) -> StoreFuture<Vec<Notification>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let items = sqlx::query_as::<_, Notification>(
                r#"
                SELECT * FROM notifications
                WHERE user_id = $1
                ORDER BY created_at DESC
                LIMIT $2
                "#,
            )
            .bind(user_id)
            .bind(limit)
            .fetch_all(&pool)
            .await?;
            Ok(items)
        })
    }

    fn mark_read(&self, user_id: Uuid, id: Uuid) -> StoreFuture<bool> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let result =
                sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
                    .bind(id)
                    .bind(user_id)
                    .execute(&pool)
                    .await?;
            Ok(result.rows_affected() > 0)
        })
    }

    fn mark_all_read(&self, user_id: Uuid) -> StoreFuture<u64> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let result = sqlx::query(
                "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND NOT is_read",
            )
            .bind(user_id)
            .execute(&pool)
            .await?;
            Ok(result.rows_affected())
        })
    }

    fn unread_count(&self, user_id: Uuid) -> StoreFuture<i64> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT is_read",
            )
            .bind(user_id)
            .fetch_one(&pool)
            .await?;
            Ok(count)
        })
    }
}
