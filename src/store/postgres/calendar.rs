use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::calendar_event::{CalendarEvent, NewCalendarEvent};
use crate::store::{CalendarStore, StoreFuture};

#[derive(Clone)]
pub struct PgCalendarStore {
    pool: PgPool,
}

impl PgCalendarStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl CalendarStore for PgCalendarStore {
    fn insert(&self, event: NewCalendarEvent) -> StoreFuture<CalendarEvent> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let created = sqlx::query_as::<_, CalendarEvent>(
                r#"
                INSERT INTO calendar_events (user_id, title, description, event_date, start_time, location, kind)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
                "#,
            )
            .bind(event.user_id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.event_date)
            .bind(event.start_time)
            .bind(&event.location)
            .bind(event.kind.as_str())
            .fetch_one(&pool)
            .await?;
            Ok(created)
        })
    }

    fn list_between(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreFuture<Vec<CalendarEvent>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let events = sqlx::query_as::<_, CalendarEvent>(
                r#"
                SELECT * FROM calendar_events
                WHERE user_id = $1 AND event_date BETWEEN $2 AND $3
                ORDER BY event_date ASC, start_time ASC NULLS FIRST
                "#,
            )
            .bind(user_id)
            .bind(from)
            .bind(to)
            .fetch_all(&pool)
            .await?;
            Ok(events)
        })
    }

    fn delete(&self, user_id: Uuid, id: Uuid) -> StoreFuture<bool> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(&pool)
                .await?;
            Ok(result.rows_affected() > 0)
        })
    }
}
