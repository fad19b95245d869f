use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::user::{NewProfile, Profile, ProfileUpdate};
use crate::storage::{Bucket, ObjectStore};
use crate::store::UserStore;

const RESUME_TYPES: &[(&str, &str)] = &[("application/pdf", "pdf")];
const PHOTO_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

/// File extension for an accepted content type, matched case-insensitively.
fn extension_for(content_type: &str, accepted: &[(&str, &'static str)]) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    accepted
        .iter()
        .find(|(mime, _)| mime.eq_ignore_ascii_case(essence))
        .map(|(_, ext)| *ext)
}

#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserStore>,
    storage: Arc<dyn ObjectStore>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserStore>, storage: Arc<dyn ObjectStore>) -> Self {
        Self { users, storage }
    }

    /// Current profile, created from the token claims on first visit.
    pub async fn current(&self, user: &CurrentUser) -> Result<Profile> {
        if let Some(profile) = self.users.get(user.id).await? {
            return Ok(profile);
        }
        let profile = self
            .users
            .upsert(NewProfile {
                id: user.id,
                role: user.role,
                full_name: user.name.clone().unwrap_or_default(),
                email: user.email.clone().unwrap_or_default(),
            })
            .await?;
        tracing::info!(user_id = %user.id, role = %user.role, "profile created");
        Ok(profile)
    }

    pub async fn get(&self, id: Uuid) -> Result<Profile> {
        self.users
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Profile not found".into()))
    }

    pub async fn update(&self, user: &CurrentUser, changes: ProfileUpdate) -> Result<Profile> {
        self.current(user).await?;
        let profile = self.users.update(user.id, changes).await?;
        tracing::info!(user_id = %user.id, completion = profile.completion(), "profile updated");
        Ok(profile)
    }

    pub async fn upload_resume(
        &self,
        user: &CurrentUser,
        content_type: &str,
        data: Bytes,
    ) -> Result<Profile> {
        let ext = extension_for(content_type, RESUME_TYPES)
            .ok_or_else(|| Error::BadRequest("Resume must be a PDF".into()))?;
        let url = self
            .store_file(Bucket::Resumes, format!("{}.{}", user.id, ext), data)
            .await?;
        self.update(
            user,
            ProfileUpdate {
                resume_url: Some(url),
                ..Default::default()
            },
        )
        .await
    }

    pub async fn upload_photo(
        &self,
        user: &CurrentUser,
        content_type: &str,
        data: Bytes,
    ) -> Result<Profile> {
        let ext = extension_for(content_type, PHOTO_TYPES)
            .ok_or_else(|| Error::BadRequest("Photo must be a JPEG, PNG or WebP image".into()))?;
        let url = self
            .store_file(Bucket::Avatars, format!("{}.{}", user.id, ext), data)
            .await?;
        self.update(
            user,
            ProfileUpdate {
                avatar_url: Some(url),
                ..Default::default()
            },
        )
        .await
    }

    async fn store_file(&self, bucket: Bucket, name: String, data: Bytes) -> Result<String> {
        let size = data.len();
        self.storage.upload(bucket, name.clone(), data).await?;
        let url = self.storage.public_url(bucket, &name);
        tracing::info!(bucket = bucket.as_str(), %name, size, "file uploaded");
        Ok(url)
    }
}
