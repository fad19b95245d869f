use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::models::task::{NewTask, TaskPriority};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
}

impl CreateTaskPayload {
    pub fn into_task(self, owner_id: Uuid) -> NewTask {
        NewTask {
            owner_id,
            title: self.title.trim().to_string(),
            due_date: self.due_date,
            priority: self.priority.unwrap_or(TaskPriority::Medium),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskListQuery {
    pub pending_only: Option<bool>,
}
