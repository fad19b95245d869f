use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job::Job;
use crate::store::{SavedJobStore, StoreFuture};

#[derive(Clone)]
pub struct PgSavedJobStore {
    pool: PgPool,
}

impl PgSavedJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SavedJobStore for PgSavedJobStore {
    fn is_saved(&self, user_id: Uuid, job_id: Uuid) -> StoreFuture<bool> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let exists: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM saved_jobs WHERE user_id = $1 AND job_id = $2)",
            )
            .bind(user_id)
            .bind(job_id)
            .fetch_one(&pool)
            .await?;
            Ok(exists)
        })
    }

    fn save(&self, user_id: Uuid, job_id: Uuid) -> StoreFuture<()> {
        let pool = self.pool.clone();
        Box::pin(async move {
            sqlx::query(
                r#"
                INSERT INTO saved_jobs (user_id, job_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, job_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(job_id)
            .execute(&pool)
            .await?;
            Ok(())
        })
    }

    fn unsave(&self, user_id: Uuid, job_id: Uuid) -> StoreFuture<()> {
        let pool = self.pool.clone();
        Box::pin(async move {
            sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
                .bind(user_id)
                .bind(job_id)
                .execute(&pool)
                .await?;
            Ok(())
        })
    }

    fn list(&self, user_id: Uuid) -> StoreFuture<Vec<Job>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let jobs = sqlx::query_as::<_, Job>(
                r#"
                SELECT j.*
                FROM saved_jobs s
                JOIN jobs j ON j.id = s.job_id
                WHERE s.user_id = $1
                ORDER BY s.created_at DESC
                "#,
            )
            .bind(user_id)
            .fetch_all(&pool)
            .await?;
            Ok(jobs)
        })
    }

    fn count(&self, user_id: Uuid) -> StoreFuture<i64> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM saved_jobs WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&pool)
                .await?;
            Ok(count)
        })
    }
}
