use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{NewProfile, Profile, ProfileUpdate};
use crate::store::{StoreFuture, UserStore};

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserStore for PgUserStore {
    fn get(&self, id: Uuid) -> StoreFuture<Option<Profile>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let profile = sqlx::query_as::<_, Profile>("SELECT * FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&pool)
                .await?;
            Ok(profile)
        })
    }

    fn upsert(&self, profile: NewProfile) -> StoreFuture<Profile> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let stored = sqlx::query_as::<_, Profile>(
                r#"
                INSERT INTO users (id, role, full_name, email)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (id) DO UPDATE SET updated_at = users.updated_at
                RETURNING *
                "#,
            )
            .bind(profile.id)
            .bind(profile.role.as_str())
            .bind(&profile.full_name)
            .bind(&profile.email)
            .fetch_one(&pool)
            .await?;
            Ok(stored)
        })
    }

    fn update(&self, id: Uuid, changes: ProfileUpdate) -> StoreFuture<Profile> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let profile = sqlx::query_as::<_, Profile>(
                r#"
                UPDATE users
                SET
                    full_name = COALESCE($2, full_name),
                    phone = COALESCE($3, phone),
                    location = COALESCE($4, location),
                    bio = COALESCE($5, bio),
                    skills = COALESCE($6, skills),
                    avatar_url = COALESCE($7, avatar_url),
                    resume_url = COALESCE($8, resume_url),
                    company_name = COALESCE($9, company_name),
                    company_website = COALESCE($10, company_website),
                    industry = COALESCE($11, industry),
                    company_size = COALESCE($12, company_size),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(changes.full_name)
            .bind(changes.phone)
            .bind(changes.location)
            .bind(changes.bio)
            .bind(changes.skills)
            .bind(changes.avatar_url)
            .bind(changes.resume_url)
            .bind(changes.company_name)
            .bind(changes.company_website)
            .bind(changes.industry)
            .bind(changes.company_size)
            .fetch_one(&pool)
            .await?;
            Ok(profile)
        })
    }
}
