//! In-process change feed standing in for the store's realtime channel.
//!
//! Writers publish every inserted message and notification; readers hold a
//! [`Subscription`] scoped by a [`ChangeFilter`]. Dropping the subscription
//! is the unsubscribe.

use futures::Stream;
use serde::Serialize;
use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};
use uuid::Uuid;

use crate::models::{message::Message, notification::Notification};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "table", content = "record", rename_all = "snake_case")]
pub enum ChangeEvent {
    Messages(Message),
    Notifications(Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFilter {
    /// Messages exchanged between the two users, in either direction.
    Conversation { user_id: Uuid, contact_id: Uuid },
    /// Notifications addressed to the user.
    Notifications { user_id: Uuid },
}

impl ChangeFilter {
    pub fn matches(&self, event: &ChangeEvent) -> bool {
        match (self, event) {
            (ChangeFilter::Conversation { user_id, contact_id }, ChangeEvent::Messages(m)) => {
                m.is_between(*user_id, *contact_id)
            }
            (ChangeFilter::Notifications { user_id }, ChangeEvent::Notifications(n)) => {
                n.user_id == *user_id
            }
            _ => false,
        }
    }
}

#[derive(Clone)]
pub struct ChangeFeed {
    tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Returns how many subscribers saw the event; zero is not an error.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self, filter: ChangeFilter) -> Subscription {
        Subscription {
            filter,
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(256)
    }
}

pub struct Subscription {
    filter: ChangeFilter,
    rx: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    pub fn filter(&self) -> ChangeFilter {
        self.filter
    }

    /// Waits for the next matching event; `None` once the feed is gone.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, filter = ?self.filter, "change feed subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next matching event already queued, without waiting.
    pub fn try_recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, filter = ?self.filter, "change feed subscriber lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    pub fn into_stream(self) -> impl Stream<Item = ChangeEvent> + Send + 'static {
        futures::stream::unfold(self, |mut sub| async move {
            sub.recv().await.map(|event| (event, sub))
        })
    }
}
