use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job::{EmployerJob, Job, JobStatus, JobUpdate, NewJob};
use crate::store::{JobStore, StoreFuture};

#[derive(Clone)]
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl JobStore for PgJobStore {
    fn insert(&self, job: NewJob) -> StoreFuture<Job> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let created = sqlx::query_as::<_, Job>(
                r#"
                INSERT INTO jobs (
                    employer_id, title, company, location, job_type,
                    category, salary_min, salary_max, skills, description,
                    requirements, deadline, status, is_urgent
                ) VALUES (
                    $1,$2,$3,$4,$5,
                    $6,$7,$8,$9,$10,
                    $11,$12,$13,$14
                )
                RETURNING *
                "#,
            )
            .bind(job.employer_id)
            .bind(&job.title)
            .bind(&job.company)
            .bind(&job.location)
            .bind(job.job_type.as_str())
            .bind(&job.category)
            .bind(job.salary_min)
            .bind(job.salary_max)
            .bind(&job.skills)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(job.deadline)
            .bind(job.status.as_str())
            .bind(job.is_urgent)
            .fetch_one(&pool)
            .await?;
            Ok(created)
        })
    }

    fn update(&self, id: Uuid, changes: JobUpdate) -> StoreFuture<Job> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let job = sqlx::query_as::<_, Job>(
                r#"
                UPDATE jobs
                SET
                    title = COALESCE($2, title),
                    company = COALESCE($3, company),
                    location = COALESCE($4, location),
                    job_type = COALESCE($5, job_type),
                    category = COALESCE($6, category),
                    salary_min = COALESCE($7, salary_min),
                    salary_max = COALESCE($8, salary_max),
                    skills = COALESCE($9, skills),
                    description = COALESCE($10, description),
                    requirements = COALESCE($11, requirements),
                    deadline = COALESCE($12, deadline),
                    is_urgent = COALESCE($13, is_urgent),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(changes.title)
            .bind(changes.company)
            .bind(changes.location)
            .bind(changes.job_type.map(|t| t.as_str()))
            .bind(changes.category)
            .bind(changes.salary_min)
            .bind(changes.salary_max)
            .bind(changes.skills)
            .bind(changes.description)
            .bind(changes.requirements)
            .bind(changes.deadline)
            .bind(changes.is_urgent)
            .fetch_one(&pool)
            .await?;
            Ok(job)
        })
    }

    fn set_status(&self, id: Uuid, status: JobStatus) -> StoreFuture<Job> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let job = sqlx::query_as::<_, Job>(
                "UPDATE jobs SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            )
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&pool)
            .await?;
            Ok(job)
        })
    }

    fn get(&self, id: Uuid) -> StoreFuture<Option<Job>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
                .bind(id)
                .fetch_optional(&pool)
                .await?;
            Ok(job)
        })
    }

    fn list_active(&self) -> StoreFuture<Vec<Job>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let jobs = sqlx::query_as::<_, Job>(
                "SELECT * FROM jobs WHERE status = 'active' ORDER BY created_at DESC",
            )
            .fetch_all(&pool)
            .await?;
            Ok(jobs)
        })
    }

    fn list_by_employer(&self, employer_id: Uuid) -> StoreFuture<Vec<EmployerJob>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let jobs = sqlx::query_as::<_, EmployerJob>(
                r#"
                SELECT j.*,
                       (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS application_count
                FROM jobs j
                WHERE j.employer_id = $1
                ORDER BY j.created_at DESC
                "#,
            )
            .bind(employer_id)
            .fetch_all(&pool)
            .await?;
            Ok(jobs)
        })
    }

    fn close_expired(&self, today: NaiveDate) -> StoreFuture<u64> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let result = sqlx::query(
                r#"
                UPDATE jobs
                SET status = 'closed', updated_at = NOW()
                WHERE status = 'active' AND deadline IS NOT NULL AND deadline < $1
                "#,
            )
            .bind(today)
            .execute(&pool)
            .await?;
            Ok(result.rows_affected())
        })
    }
}
