//! Per-session messaging state: contact list, the open conversation and its
//! live subscription.
//!
//! Every UI event maps to one method here. Sends are optimistic: the local
//! entry is appended first and reconciled with the stored row when the write
//! returns. A failed write leaves the entry in place as [`DeliveryState::Unsynced`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::message::{Contact, Message};
use crate::realtime::{ChangeEvent, Subscription};
use crate::services::message_service::MessageService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryState {
    Pending,
    Sent,
    Unsynced,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalMessage {
    pub local_id: u64,
    pub server_id: Option<Uuid>,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
    pub state: DeliveryState,
}

struct ActiveConversation {
    contact_id: Uuid,
    messages: Vec<LocalMessage>,
    subscription: Subscription,
}

pub struct MessagingCenter {
    user_id: Uuid,
    service: MessageService,
    contacts: Vec<Contact>,
    active: Option<ActiveConversation>,
    next_local_id: u64,
    scroll_requested: bool,
}

impl MessagingCenter {
    pub fn new(user_id: Uuid, service: MessageService) -> Self {
        Self {
            user_id,
            service,
            contacts: Vec::new(),
            active: None,
            next_local_id: 1,
            scroll_requested: false,
        }
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn active_contact(&self) -> Option<Uuid> {
        self.active.as_ref().map(|a| a.contact_id)
    }

    pub fn messages(&self) -> &[LocalMessage] {
        self.active
            .as_ref()
            .map(|a| a.messages.as_slice())
            .unwrap_or(&[])
    }

    /// Reloads contacts; a store failure leaves an empty list.
    pub async fn load_contacts(&mut self) -> &[Contact] {
        self.contacts = match self.service.contacts(self.user_id).await {
            Ok(contacts) => contacts,
            Err(e) => {
                tracing::error!(error = %e, user_id = %self.user_id, "failed to load contacts");
                Vec::new()
            }
        };
        &self.contacts
    }

    /// Opens the conversation with `contact_id`, replacing any previous one
    /// and its subscription.
    pub async fn select_contact(&mut self, contact_id: Uuid) -> Result<()> {
        // unsubscribe before loading so nothing from the old pair leaks in
        self.active = None;

        let subscription = self.service.subscribe(self.user_id, contact_id);
        let history = self.service.conversation(self.user_id, contact_id).await?;
        let mut messages: Vec<LocalMessage> = history
            .into_iter()
            .map(|m| self.from_server(m))
            .collect();
        messages.sort_by_key(|m| m.created_at);

        if let Some(contact) = self.contacts.iter_mut().find(|c| c.user_id == contact_id) {
            contact.unread_count = 0;
        }
        self.active = Some(ActiveConversation {
            contact_id,
            messages,
            subscription,
        });
        self.scroll_requested = true;
        Ok(())
    }

    /// Appends `content` optimistically and writes it; returns the local entry.
    pub async fn send(&mut self, content: &str) -> Result<LocalMessage> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::BadRequest("Message cannot be empty".into()));
        }
        let user_id = self.user_id;
        let local_id = self.next_local_id;
        let Some(active) = self.active.as_mut() else {
            return Err(Error::BadRequest("No conversation selected".into()));
        };
        self.next_local_id += 1;

        let contact_id = active.contact_id;
        active.messages.push(LocalMessage {
            local_id,
            server_id: None,
            sender_id: user_id,
            receiver_id: contact_id,
            content: content.to_string(),
            created_at: Utc::now(),
            is_read: false,
            state: DeliveryState::Pending,
        });
        self.scroll_requested = true;

        let outcome = self.service.send(user_id, contact_id, content).await;
        let Some(active) = self.active.as_mut() else {
            return Err(Error::Internal("Conversation closed during send".into()));
        };
        let Some(entry) = active.messages.iter_mut().find(|m| m.local_id == local_id) else {
            return Err(Error::Internal("Optimistic message missing".into()));
        };
        match outcome {
            Ok(stored) => {
                entry.server_id = Some(stored.id);
                entry.created_at = stored.created_at;
                entry.state = DeliveryState::Sent;
            }
            Err(e) => {
                tracing::warn!(error = %e, %user_id, %contact_id, "message kept locally after failed send");
                entry.state = DeliveryState::Unsynced;
            }
        }
        let entry = entry.clone();
        self.bump_contact(contact_id, &entry);
        Ok(entry)
    }

    /// Applies every feed event already queued; returns how many messages were appended.
    pub fn poll_inbound(&mut self) -> usize {
        let mut appended = 0;
        loop {
            let Some(active) = self.active.as_mut() else {
                return appended;
            };
            match active.subscription.try_recv() {
                Some(ChangeEvent::Messages(message)) => {
                    if self.apply_inbound(message) {
                        appended += 1;
                    }
                }
                Some(_) => continue,
                None => return appended,
            }
        }
    }

    /// Waits for the next new message in the active conversation.
    pub async fn next_inbound(&mut self) -> Option<LocalMessage> {
        loop {
            let event = self.active.as_mut()?.subscription.recv().await?;
            if let ChangeEvent::Messages(message) = event {
                if self.apply_inbound(message) {
                    return self.messages().last().cloned();
                }
            }
        }
    }

    /// True once after new messages were appended.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    fn apply_inbound(&mut self, message: Message) -> bool {
        let user_id = self.user_id;
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if !message.is_between(user_id, active.contact_id) {
            return false;
        }
        // our own sends come back through the feed too
        if active
            .messages
            .iter()
            .any(|m| m.server_id == Some(message.id))
        {
            return false;
        }
        let contact_id = active.contact_id;
        let incoming = message.sender_id == contact_id;
        let local = self.from_server(message);
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        active.messages.push(local.clone());
        self.scroll_requested = true;
        self.bump_contact(contact_id, &local);
        if incoming {
            tracing::debug!(%user_id, %contact_id, "inbound message appended");
        }
        true
    }

    fn from_server(&mut self, message: Message) -> LocalMessage {
        let local_id = self.next_local_id;
        self.next_local_id += 1;
        LocalMessage {
            local_id,
            server_id: Some(message.id),
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content,
            created_at: message.created_at,
            is_read: message.is_read,
            state: DeliveryState::Sent,
        }
    }

    fn bump_contact(&mut self, contact_id: Uuid, message: &LocalMessage) {
        if let Some(contact) = self.contacts.iter_mut().find(|c| c.user_id == contact_id) {
            contact.last_message = Some(message.content.clone());
            contact.last_message_at = Some(message.created_at);
        }
        self.contacts
            .sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notification::Notification;
    use crate::realtime::ChangeFeed;
    use crate::services::notification_service::NotificationService;
    use crate::store::{ready, MockMessageStore, MockNotificationStore};
    use chrono::Duration;
    use std::sync::Arc;

    fn quiet_notifications() -> NotificationService {
        let mut store = MockNotificationStore::new();
        store.expect_insert().returning(|new| {
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

    fn stored(sender_id: Uuid, receiver_id: Uuid, content: &str, minutes_ago: i64) -> Message {
        Message {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            content: content.into(),
            is_read: false,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    fn center(store: MockMessageStore, feed: &ChangeFeed, user_id: Uuid) -> MessagingCenter {
        let service = MessageService::new(Arc::new(store), quiet_notifications(), feed.clone());
        MessagingCenter::new(user_id, service)
    }

    fn store_with_history(history: Vec<Message>) -> MockMessageStore {
        let mut store = MockMessageStore::new();
        store
            .expect_conversation()
            .returning(move |_, _| ready(Ok(history.clone())));
        store.expect_mark_read().returning(|_, _| ready(Ok(0)));
        store
    }

    #[tokio::test]
    async fn select_orders_history_and_requests_scroll() {
        let (me, them) = (Uuid::new_v4(), Uuid::new_v4());
        let history = vec![
            stored(them, me, "second", 1),
            stored(me, them, "first", 5),
        ];
        let feed = ChangeFeed::new(16);
        let mut center = center(store_with_history(history), &feed, me);

        center.select_contact(them).await.unwrap();
        let texts: Vec<&str> = center.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(center.take_scroll_request());
        assert!(!center.take_scroll_request());
    }

    #[tokio::test]
    async fn successful_send_is_reconciled_with_server_id() {
        let (me, them) = (Uuid::new_v4(), Uuid::new_v4());
        let mut store = store_with_history(vec![]);
        let server_id = Uuid::new_v4();
        store.expect_insert().returning(move |m| {
            ready(Ok(Message {
                id: server_id,
                sender_id: m.sender_id,
                receiver_id: m.receiver_id,
                content: m.content,
                is_read: false,
                created_at: Utc::now(),
            }))
        });
        let feed = ChangeFeed::new(16);
        let mut center = center(store, &feed, me);
        center.select_contact(them).await.unwrap();

        let sent = center.send("Niko njiani").await.unwrap();
        assert_eq!(sent.state, DeliveryState::Sent);
        assert_eq!(sent.server_id, Some(server_id));

        // the feed echo of our own send is not appended twice
        assert_eq!(center.poll_inbound(), 0);
        assert_eq!(center.messages().len(), 1);
    }

    #[tokio::test]
    async fn failed_send_keeps_optimistic_entry() {
        let (me, them) = (Uuid::new_v4(), Uuid::new_v4());
        let mut store = store_with_history(vec![]);
        store
            .expect_insert()
            .returning(|_| ready(Err(Error::Internal("offline".into()))));
        let feed = ChangeFeed::new(16);
        let mut center = center(store, &feed, me);
        center.select_contact(them).await.unwrap();

        let kept = center.send("are you there?").await.unwrap();
        assert_eq!(kept.state, DeliveryState::Unsynced);
        assert_eq!(kept.server_id, None);
        assert_eq!(center.messages().len(), 1);
        assert_eq!(center.messages()[0].content, "are you there?");
    }

    #[tokio::test]
    async fn blank_send_and_send_without_contact_are_rejected() {
        let feed = ChangeFeed::new(4);
        let mut center = center(MockMessageStore::new(), &feed, Uuid::new_v4());
        assert!(center.send("hello").await.is_err());
        assert!(center.send("   ").await.is_err());
        assert!(center.messages().is_empty());
    }

    #[tokio::test]
    async fn inbound_for_active_pair_is_appended_once() {
        let (me, them, other) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let feed = ChangeFeed::new(16);
        let mut center = center(store_with_history(vec![]), &feed, me);
        center.select_contact(them).await.unwrap();
        center.take_scroll_request();

        let incoming = stored(them, me, "Interview ni kesho", 0);
        feed.publish(ChangeEvent::Messages(incoming.clone()));
        feed.publish(ChangeEvent::Messages(incoming));
        feed.publish(ChangeEvent::Messages(stored(other, me, "elsewhere", 0)));

        assert_eq!(center.poll_inbound(), 1);
        assert_eq!(center.messages().len(), 1);
        assert!(center.take_scroll_request());
    }

    #[tokio::test]
    async fn switching_contact_replaces_subscription() {
        let (me, first, second) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let feed = ChangeFeed::new(16);
        let mut center = center(store_with_history(vec![]), &feed, me);

        center.select_contact(first).await.unwrap();
        assert_eq!(feed.subscriber_count(), 1);
        center.select_contact(second).await.unwrap();
        assert_eq!(feed.subscriber_count(), 1);
        assert_eq!(center.active_contact(), Some(second));

        feed.publish(ChangeEvent::Messages(stored(first, me, "old pair", 0)));
        feed.publish(ChangeEvent::Messages(stored(second, me, "new pair", 0)));
        let next = center.next_inbound().await.unwrap();
        assert_eq!(next.content, "new pair");
    }

    #[tokio::test]
    async fn contact_failure_degrades_to_empty() {
        let mut store = MockMessageStore::new();
        store
            .expect_contacts()
            .returning(|_| ready(Err(Error::Internal("timeout".into()))));
        let feed = ChangeFeed::new(4);
        let mut center = center(store, &feed, Uuid::new_v4());
        assert!(center.load_contacts().await.is_empty());
    }
}
