use std::sync::Arc;

use uuid::Uuid;

use crate::error::Result;
use crate::models::job::Job;
use crate::models::saved_job::SaveState;
use crate::store::SavedJobStore;

#[derive(Clone)]
pub struct SavedJobService {
    store: Arc<dyn SavedJobStore>,
}

impl SavedJobService {
    pub fn new(store: Arc<dyn SavedJobStore>) -> Self {
        Self { store }
    }

    pub async fn toggle(&self, user_id: Uuid, job_id: Uuid) -> Result<SaveState> {
        let state = if self.store.is_saved(user_id, job_id).await? {
            self.store.unsave(user_id, job_id).await?;
            SaveState::Unsaved
        } else {
            self.store.save(user_id, job_id).await?;
            SaveState::Saved
        };
        tracing::debug!(%user_id, %job_id, saved = state.is_saved(), "saved job toggled");
        Ok(state)
    }

    pub async fn is_saved(&self, user_id: Uuid, job_id: Uuid) -> Result<bool> {
        self.store.is_saved(user_id, job_id).await
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<Job>> {
        self.store.list(user_id).await
    }

    pub async fn count(&self, user_id: Uuid) -> Result<i64> {
        self.store.count(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ready, MockSavedJobStore};
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Store mock backed by a shared set so toggles observe each other.
    fn set_backed_store(rows: Arc<Mutex<HashSet<(Uuid, Uuid)>>>) -> MockSavedJobStore {
        let mut store = MockSavedJobStore::new();
        let seen = rows.clone();
        store.expect_is_saved().returning(move |u, j| {
            let present = seen.lock().unwrap().contains(&(u, j));
            ready(Ok(present))
        });
        let added = rows.clone();
        store.expect_save().returning(move |u, j| {
            added.lock().unwrap().insert((u, j));
            ready(Ok(()))
        });
        let removed = rows;
        store.expect_unsave().returning(move |u, j| {
            removed.lock().unwrap().remove(&(u, j));
            ready(Ok(()))
        });
        store
    }

    #[tokio::test]
    async fn two_toggles_return_to_original_state() {
        let rows = Arc::new(Mutex::new(HashSet::new()));
        let service = SavedJobService::new(Arc::new(set_backed_store(rows.clone())));
        let (user, job) = (Uuid::new_v4(), Uuid::new_v4());

        assert_eq!(service.toggle(user, job).await.unwrap(), SaveState::Saved);
        assert!(rows.lock().unwrap().contains(&(user, job)));
        assert_eq!(service.toggle(user, job).await.unwrap(), SaveState::Unsaved);
        assert!(rows.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn toggle_starts_from_stored_state() {
        let (user, job) = (Uuid::new_v4(), Uuid::new_v4());
        let rows = Arc::new(Mutex::new(HashSet::from([(user, job)])));
        let service = SavedJobService::new(Arc::new(set_backed_store(rows)));
        assert_eq!(service.toggle(user, job).await.unwrap(), SaveState::Unsaved);
        assert!(!service.is_saved(user, job).await.unwrap());
    }
}
