use sqlx::PgPool;
use uuid::Uuid;

use crate::models::application::{Application, ApplicationDetail, NewApplication, StatusChange};
use crate::store::{ApplicationStore, StoreFuture};

const DETAIL_SELECT: &str = r#"
    SELECT a.*,
           j.title AS job_title,
           j.company,
           j.employer_id,
           u.full_name AS applicant_name,
           u.email AS applicant_email,
           u.skills AS applicant_skills,
           u.location AS applicant_location,
           u.rating AS applicant_rating
    FROM applications a
    JOIN jobs j ON j.id = a.job_id
    JOIN users u ON u.id = a.applicant_id
"#;

#[derive(Clone)]
pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ApplicationStore for PgApplicationStore {
    fn insert(&self, application: NewApplication) -> StoreFuture<Application> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let created = sqlx::query_as::<_, Application>(
                r#"
                INSERT INTO applications (job_id, applicant_id, cover_letter, resume_url, status)
                VALUES ($1, $2, $3, $4, 'pending')
                RETURNING *
                "#,
            )
            .bind(application.job_id)
            .bind(application.applicant_id)
            .bind(&application.cover_letter)
            .bind(&application.resume_url)
            .fetch_one(&pool)
            .await?;
            Ok(created)
        })
    }

    fn get(&self, id: Uuid) -> StoreFuture<Option<ApplicationDetail>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let query = format!("{} WHERE a.id = $1", DETAIL_SELECT);
            let detail = sqlx::query_as::<_, ApplicationDetail>(&query)
                .bind(id)
                .fetch_optional(&pool)
                .await?;
            Ok(detail)
        })
    }

    fn find(&self, job_id: Uuid, applicant_id: Uuid) -> StoreFuture<Option<Application>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let found = sqlx::query_as::<_, Application>(
                "SELECT * FROM applications WHERE job_id = $1 AND applicant_id = $2",
            )
            .bind(job_id)
            .bind(applicant_id)
            .fetch_optional(&pool)
            .await?;
            Ok(found)
        })
    }

    fn list_for_applicant(&self, applicant_id: Uuid) -> StoreFuture<Vec<ApplicationDetail>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let query = format!(
                "{} WHERE a.applicant_id = $1 ORDER BY a.applied_at DESC",
                DETAIL_SELECT
            );
            let items = sqlx::query_as::<_, ApplicationDetail>(&query)
                .bind(applicant_id)
                .fetch_all(&pool)
                .await?;
            Ok(items)
        })
    }

    fn list_for_employer(&self, employer_id: Uuid) -> StoreFuture<Vec<ApplicationDetail>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let query = format!(
                "{} WHERE j.employer_id = $1 ORDER BY a.applied_at DESC",
                DETAIL_SELECT
            );
            let items = sqlx::query_as::<_, ApplicationDetail>(&query)
                .bind(employer_id)
                .fetch_all(&pool)
                .await?;
            Ok(items)
        })
    }

    fn update_status(&self, id: Uuid, change: StatusChange) -> StoreFuture<Application> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let updated = sqlx::query_as::<_, Application>(
                r#"
                UPDATE applications
                SET
                    status = $2,
                    interview_date = COALESCE($3, interview_date),
                    notes = COALESCE($4, notes),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(change.status.as_str())
            .bind(change.interview_date)
            .bind(change.notes)
            .fetch_one(&pool)
            .await?;
            Ok(updated)
        })
    }
}
