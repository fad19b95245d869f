use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::notification::{NewNotification, Notification, NotificationKind};
use crate::realtime::{ChangeEvent, ChangeFeed, ChangeFilter, Subscription};
use crate::store::NotificationStore;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    feed: ChangeFeed,
}

impl NotificationService {
    pub fn new(store: Arc<dyn NotificationStore>, feed: ChangeFeed) -> Self {
        Self { store, feed }
    }

    pub async fn notify(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Notification> {
        let notification = self
            .store
            .insert(NewNotification {
                user_id,
                title: title.into(),
                message: message.into(),
                kind,
            })
            .await?;
        let delivered = self
            .feed
            .publish(ChangeEvent::Notifications(notification.clone()));
        tracing::debug!(notification_id = %notification.id, %user_id, delivered, "notification published");
        Ok(notification)
    }

    /// Side-effect notification: a failure is logged and never fails the caller.
    pub async fn notify_quietly(
        &self,
        user_id: Uuid,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) {
        if let Err(e) = self.notify(user_id, kind, title, message).await {
            tracing::error!(error = %e, %user_id, kind = %kind, "failed to record notification");
        }
    }

    pub async fn list(&self, user_id: Uuid, limit: Option<i64>) -> Result<Vec<Notification>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        self.store.list(user_id, limit).await
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        self.store.unread_count(user_id).await
    }

    pub async fn mark_read(&self, user_id: Uuid, id: Uuid) -> Result<()> {
        if self.store.mark_read(user_id, id).await? {
            Ok(())
        } else {
            Err(Error::NotFound("Notification not found".into()))
        }
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        self.store.mark_all_read(user_id).await
    }

    pub fn subscribe(&self, user_id: Uuid) -> Subscription {
        self.feed.subscribe(ChangeFilter::Notifications { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{ready, MockNotificationStore};
    use chrono::Utc;

    fn stored(new: NewNotification) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            title: new.title,
            message: new.message,
            kind: new.kind,
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn notify_persists_and_publishes() {
        let user_id = Uuid::new_v4();
        let mut store = MockNotificationStore::new();
        store
            .expect_insert()
            .times(1)
            .returning(|new| ready(Ok(stored(new))));

        let feed = ChangeFeed::new(8);
        let service = NotificationService::new(Arc::new(store), feed);
        let mut sub = service.subscribe(user_id);

        let created = service
            .notify(user_id, NotificationKind::System, "Welcome", "Karibu JobSoko")
            .await
            .unwrap();

        match sub.try_recv() {
            Some(ChangeEvent::Notifications(n)) => assert_eq!(n.id, created.id),
            other => panic!("expected notification event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn notify_quietly_swallows_store_errors() {
        let mut store = MockNotificationStore::new();
        store
            .expect_insert()
            .returning(|_| ready(Err(Error::Internal("down".into()))));
        let service = NotificationService::new(Arc::new(store), ChangeFeed::default());
        service
            .notify_quietly(Uuid::new_v4(), NotificationKind::Message, "t", "m")
            .await;
    }

    #[tokio::test]
    async fn list_clamps_limit_and_mark_read_reports_missing() {
        let mut store = MockNotificationStore::new();
        store
            .expect_list()
            .withf(|_, limit| *limit == MAX_LIMIT)
            .returning(|_, _| ready(Ok(vec![])));
        store
            .expect_mark_read()
            .returning(|_, _| ready(Ok(false)));
        let service = NotificationService::new(Arc::new(store), ChangeFeed::default());

        assert!(service.list(Uuid::new_v4(), Some(10_000)).await.unwrap().is_empty());
        let missing = service.mark_read(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }
}
