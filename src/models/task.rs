use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

text_enum!(TaskPriority {
    Low => "low",
    Medium => "medium",
    High => "high",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    #[sqlx(try_from = "String")]
    pub priority: TaskPriority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub owner_id: Uuid,
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub priority: TaskPriority,
}
