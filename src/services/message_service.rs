use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::message::{Contact, CreateMessage, Message};
use crate::models::notification::NotificationKind;
use crate::realtime::{ChangeEvent, ChangeFeed, ChangeFilter, Subscription};
use crate::services::notification_service::NotificationService;
use crate::store::MessageStore;

pub const MAX_MESSAGE_LEN: usize = 4000;
const PREVIEW_LEN: usize = 80;

#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
    notifications: NotificationService,
    feed: ChangeFeed,
}

impl MessageService {
    pub fn new(
        store: Arc<dyn MessageStore>,
        notifications: NotificationService,
        feed: ChangeFeed,
    ) -> Self {
        Self {
            store,
            notifications,
            feed,
        }
    }

    pub async fn send(&self, sender_id: Uuid, receiver_id: Uuid, content: &str) -> Result<Message> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::BadRequest("Message cannot be empty".into()));
        }
        if content.chars().count() > MAX_MESSAGE_LEN {
            return Err(Error::BadRequest(format!(
                "Message cannot exceed {} characters",
                MAX_MESSAGE_LEN
            )));
        }
        if sender_id == receiver_id {
            return Err(Error::BadRequest("Cannot message yourself".into()));
        }

        let message = self
            .store
            .insert(CreateMessage {
                sender_id,
                receiver_id,
                content: content.to_string(),
            })
            .await?;
        self.feed.publish(ChangeEvent::Messages(message.clone()));
        tracing::info!(message_id = %message.id, %sender_id, %receiver_id, "message sent");

        self.notifications
            .notify_quietly(
                receiver_id,
                NotificationKind::Message,
                "New message",
                preview(&message.content),
            )
            .await;
        Ok(message)
    }

    /// Full thread with `contact_id`; opening it marks their messages read.
    pub async fn conversation(&self, user_id: Uuid, contact_id: Uuid) -> Result<Vec<Message>> {
        let messages = self.store.conversation(user_id, contact_id).await?;
        self.mark_read(user_id, contact_id).await;
        Ok(messages)
    }

    pub async fn mark_read(&self, user_id: Uuid, contact_id: Uuid) {
        match self.store.mark_read(user_id, contact_id).await {
            Ok(0) => {}
            Ok(marked) => tracing::debug!(%user_id, %contact_id, marked, "messages marked read"),
            Err(e) => tracing::warn!(error = %e, %user_id, %contact_id, "failed to mark messages read"),
        }
    }

    pub async fn contacts(&self, user_id: Uuid) -> Result<Vec<Contact>> {
        self.store.contacts(user_id).await
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        self.store.unread_count(user_id).await
    }

    pub fn subscribe(&self, user_id: Uuid, contact_id: Uuid) -> Subscription {
        self.feed
            .subscribe(ChangeFilter::Conversation { user_id, contact_id })
    }
}

fn preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_LEN {
        return content.to_string();
    }
    let mut short: String = content.chars().take(PREVIEW_LEN).collect();
    short.push_str("...");
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::Notification;
    use crate::store::{ready, MockMessageStore, MockNotificationStore};
    use chrono::Utc;

    fn notifications_expecting(times: usize) -> NotificationService {
        let mut store = MockNotificationStore::new();
        store.expect_insert().times(times).returning(|new| {
            ready(Ok(Notification {
                id: Uuid::new_v4(),
                user_id: new.user_id,
                title: new.title,
                message: new.message,
                kind: new.kind,
                is_read: false,
                created_at: Utc::now(),
            }))
        });
        NotificationService::new(Arc::new(store), ChangeFeed::default())
    }

    #[tokio::test]
    async fn send_trims_publishes_and_notifies_receiver() {
        let (me, them) = (Uuid::new_v4(), Uuid::new_v4());
        let mut store = MockMessageStore::new();
        store
            .expect_insert()
            .withf(|m| m.content == "Habari yako")
            .times(1)
            .returning(|m| {
                ready(Ok(Message {
                    id: Uuid::new_v4(),
                    sender_id: m.sender_id,
                    receiver_id: m.receiver_id,
                    content: m.content,
                    is_read: false,
                    created_at: Utc::now(),
                }))
            });

        let feed = ChangeFeed::new(8);
        let service = MessageService::new(Arc::new(store), notifications_expecting(1), feed);
        let mut thread = service.subscribe(them, me);

        let sent = service.send(me, them, "  Habari yako  ").await.unwrap();
        match thread.try_recv() {
            Some(ChangeEvent::Messages(m)) => assert_eq!(m, sent),
            other => panic!("expected message event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn blank_or_self_messages_are_rejected() {
        let mut store = MockMessageStore::new();
        store.expect_insert().never();
        let service = MessageService::new(
            Arc::new(store),
            notifications_expecting(0),
            ChangeFeed::default(),
        );
        let me = Uuid::new_v4();

        assert!(matches!(
            service.send(me, Uuid::new_v4(), "   ").await,
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(
            service.send(me, me, "hello").await,
            Err(Error::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn opening_a_conversation_marks_it_read() {
        let (me, them) = (Uuid::new_v4(), Uuid::new_v4());
        let mut store = MockMessageStore::new();
        store
            .expect_conversation()
            .returning(|_, _| ready(Ok(vec![])));
        store
            .expect_mark_read()
            .withf(move |receiver, sender| *receiver == me && *sender == them)
            .times(1)
            .returning(|_, _| ready(Ok(3)));
        let service = MessageService::new(
            Arc::new(store),
            notifications_expecting(0),
            ChangeFeed::default(),
        );
        assert!(service.conversation(me, them).await.unwrap().is_empty());
    }

    #[test]
    fn preview_truncates_long_messages() {
        let long = "a".repeat(200);
        let short = preview(&long);
        assert_eq!(short.chars().count(), PREVIEW_LEN + 3);
        assert_eq!(preview("short"), "short");
    }
}
