use sqlx::PgPool;
use uuid::Uuid;

use crate::models::message::{Contact, CreateMessage, Message};
use crate::store::{MessageStore, StoreFuture};

#[derive(Clone)]
pub struct PgMessageStore {
    pool: PgPool,
}

impl PgMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl MessageStore for PgMessageStore {
    fn insert(&self, message: CreateMessage) -> StoreFuture<Message> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let created = sqlx::query_as::<_, Message>(
                r#"
                INSERT INTO messages (sender_id, receiver_id, content)
                VALUES ($1, $2, $3)
                RETURNING *
                "#,
            )
            .bind(message.sender_id)
            .bind(message.receiver_id)
            .bind(&message.content)
            .fetch_one(&pool)
            .await?;
            Ok(created)
        })
    }

    fn conversation(&self, user_id: Uuid, contact_id: Uuid) -> StoreFuture<Vec<Message>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let messages = sqlx::query_as::<_, Message>(
                r#"
                SELECT * FROM messages
                WHERE (sender_id = $1 AND receiver_id = $2)
                   OR (sender_id = $2 AND receiver_id = $1)
                ORDER BY created_at ASC
                "#,
            )
            .bind(user_id)
            .bind(contact_id)
            .fetch_all(&pool)
            .await?;
            Ok(messages)
        })
    }

    fn contacts(&self, user_id: Uuid) -> StoreFuture<Vec<Contact>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let contacts = sqlx::query_as::<_, Contact>(
                r#"
                WITH pairs AS (
                    SELECT CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END AS contact_id,
                           content,
                           created_at,
                           (receiver_id = $1 AND NOT is_read) AS unread
                    FROM messages
                    WHERE sender_id = $1 OR receiver_id = $1
                ),
                latest AS (
                    SELECT DISTINCT ON (contact_id) contact_id, content, created_at
                    FROM pairs
                    ORDER BY contact_id, created_at DESC
                ),
                unread AS (
                    SELECT contact_id, COUNT(*) FILTER (WHERE unread) AS unread_count
                    FROM pairs
                    GROUP BY contact_id
                )
                SELECT u.id AS user_id,
                       u.full_name,
                       u.avatar_url,
                       l.content AS last_message,
                       l.created_at AS last_message_at,
                       un.unread_count
                FROM latest l
                JOIN users u ON u.id = l.contact_id
                JOIN unread un ON un.contact_id = l.contact_id
                ORDER BY l.created_at DESC
                "#,
            )
            .bind(user_id)
            .fetch_all(&pool)
            .await?;
            Ok(contacts)
        })
    }

    fn mark_read(&self, receiver_id: Uuid, sender_id: Uuid) -> StoreFuture<u64> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let result = sqlx::query(
                r#"
                UPDATE messages
                SET is_read = TRUE
                WHERE receiver_id = $1 AND sender_id = $2 AND NOT is_read
                "#,
            )
            .bind(receiver_id)
            .bind(sender_id)
            .execute(&pool)
            .await?;
            Ok(result.rows_affected())
        })
    }

    fn unread_count(&self, user_id: Uuid) -> StoreFuture<i64> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND NOT is_read",
            )
            .bind(user_id)
            .fetch_one(&pool)
            .await?;
            Ok(count)
        })
    }
}
