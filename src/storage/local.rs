use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use tokio::fs;
use tracing::{debug, info};

use super::{Bucket, ObjectStore};
use crate::error::{Error, Result};
use crate::store::StoreFuture;

/// Filesystem-backed object store; files are served under `/uploads`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    base_path: PathBuf,
    public_base_url: String,
    max_size: usize,
}

impl LocalObjectStore {
    pub async fn new(base_path: PathBuf, public_base_url: String, max_size: usize) -> Result<Self> {
        for bucket in [Bucket::Resumes, Bucket::Avatars] {
            fs::create_dir_all(base_path.join(bucket.as_str()))
                .await
                .map_err(|e| {
                    Error::Storage(format!(
                        "Failed to create upload directory '{}': {}",
                        base_path.display(),
                        e
                    ))
                })?;
        }

        info!(path = %base_path.display(), "Object store initialized");

        Ok(Self {
            base_path,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Rejects names that would escape the bucket directory.
fn safe_object_name(name: &str) -> Result<&str> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.is_empty() => Ok(name),
        _ => Err(Error::BadRequest(format!("Invalid object name: {}", name))),
    }
}

impl ObjectStore for LocalObjectStore {
    fn upload(&self, bucket: Bucket, name: String, data: Bytes) -> StoreFuture<String> {
        let store = self.clone();
        Box::pin(async move {
            if data.is_empty() {
                return Err(Error::BadRequest("Uploaded file is empty".into()));
            }
            if data.len() > store.max_size {
                return Err(Error::BadRequest(format!(
                    "File too large: {} bytes (max {})",
                    data.len(),
                    store.max_size
                )));
            }
            let name = safe_object_name(&name)?.to_string();
            let path = store.base_path.join(bucket.as_str()).join(&name);
            fs::write(&path, &data).await?;
            debug!(path = %path.display(), size = data.len(), "object stored");
            Ok(format!("{}/{}", bucket.as_str(), name))
        })
    }

    fn public_url(&self, bucket: Bucket, name: &str) -> String {
        format!("{}/uploads/{}/{}", self.public_base_url, bucket.as_str(), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("jobsoko-store-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn upload_writes_file_and_builds_public_url() {
        let dir = temp_dir();
        let store = LocalObjectStore::new(dir.clone(), "http://cdn.test/".into(), 1024)
            .await
            .unwrap();

        let key = store
            .upload(Bucket::Resumes, "cv.pdf".into(), Bytes::from_static(b"%PDF-1.4"))
            .await
            .unwrap();
        assert_eq!(key, "resumes/cv.pdf");
        assert!(dir.join("resumes/cv.pdf").exists());
        assert_eq!(
            store.public_url(Bucket::Resumes, "cv.pdf"),
            "http://cdn.test/uploads/resumes/cv.pdf"
        );

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn rejects_traversal_and_oversized_files() {
        let dir = temp_dir();
        let store = LocalObjectStore::new(dir.clone(), "http://cdn.test".into(), 4)
            .await
            .unwrap();

        let traversal = store
            .upload(Bucket::Avatars, "../x.png".into(), Bytes::from_static(b"ab"))
            .await;
        assert!(matches!(traversal, Err(Error::BadRequest(_))));

        let too_big = store
            .upload(Bucket::Avatars, "me.png".into(), Bytes::from_static(b"abcdef"))
            .await;
        assert!(matches!(too_big, Err(Error::BadRequest(_))));

        let _ = std::fs::remove_dir_all(dir);
    }
}
