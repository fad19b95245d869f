//! Object storage for resumes and profile photos.

mod local;

pub use local::LocalObjectStore;

use bytes::Bytes;

use crate::store::StoreFuture;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Resumes,
    Avatars,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Resumes => "resumes",
            Bucket::Avatars => "avatars",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait ObjectStore: Send + Sync {
    /// Stores `data` under `name`, replacing any previous object; returns the object key.
    fn upload(&self, bucket: Bucket, name: String, data: Bytes) -> StoreFuture<String>;
    fn public_url(&self, bucket: Bucket, name: &str) -> String;
}
