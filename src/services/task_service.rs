use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::task::{NewTask, Task};
use crate::store::TaskStore;

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, task: NewTask) -> Result<Task> {
        if task.title.trim().is_empty() {
            return Err(Error::BadRequest("Task title is required".into()));
        }
        self.store.insert(task).await
    }

    pub async fn list(&self, owner_id: Uuid, pending_only: bool) -> Result<Vec<Task>> {
        self.store.list(owner_id, pending_only).await
    }

    pub async fn toggle(&self, owner_id: Uuid, id: Uuid) -> Result<Task> {
        self.store
            .toggle(owner_id, id)
            .await?
            .ok_or_else(|| Error::NotFound("Task not found".into()))
    }

    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<()> {
        if self.store.delete(owner_id, id).await? {
            Ok(())
        } else {
            Err(Error::NotFound("Task not found".into()))
        }
    }
}
