use sqlx::PgPool;
use uuid::Uuid;

use crate::models::task::{NewTask, Task};
use crate::store::{StoreFuture, TaskStore};

#[derive(Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl TaskStore for PgTaskStore {
    fn insert(&self, task: NewTask) -> StoreFuture<Task> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let created = sqlx::query_as::<_, Task>(
                r#"
                INSERT INTO tasks (owner_id, title, due_date, priority)
                VALUES ($1, $2, $3, $4)
                RETURNING *
                "#,
            )
            .bind(task.owner_id)
            .bind(&task.title)
            .bind(task.due_date)
            .bind(task.priority.as_str())
            .fetch_one(&pool)
            .await?;
            Ok(created)
        })
    }

    fn list(&self, owner_id: Uuid, pending_only: bool) -> StoreFuture<Vec<Task>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let tasks = sqlx::query_as::<_, Task>(
                r#"
                SELECT * FROM tasks
                WHERE owner_id = $1 AND (NOT $2 OR NOT completed)
                ORDER BY completed ASC, due_date ASC NULLS LAST, created_at DESC
                "#,
            )
            .bind(owner_id)
            .bind(pending_only)
            .fetch_all(&pool)
            .await?;
            Ok(tasks)
        })
    }

    fn toggle(&self, owner_id: Uuid, id: Uuid) -> StoreFuture<Option<Task>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let task = sqlx::query_as::<_, Task>(
                r#"
                UPDATE tasks SET completed = NOT completed
                WHERE id = $1 AND owner_id = $2
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&pool)
            .await?;
            Ok(task)
        })
    }

    fn delete(&self, owner_id: Uuid, id: Uuid) -> StoreFuture<bool> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
                .bind(id)
                .bind(owner_id)
                .execute(&pool)
                .await?;
            Ok(result.rows_affected() > 0)
        })
    }
}
