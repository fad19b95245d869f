//! Table-level access to the hosted data store.
//!
//! Each collection gets its own trait so services depend only on the
//! tables they touch. Futures are boxed and `'static` so the traits stay
//! object safe and can be mocked in tests.

pub mod postgres;

use chrono::NaiveDate;
use futures::future::BoxFuture;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    application::{Application, ApplicationDetail, NewApplication, StatusChange},
    calendar_event::{CalendarEvent, NewCalendarEvent},
    job::{EmployerJob, Job, JobStatus, JobUpdate, NewJob},
    message::{Contact, CreateMessage, Message},
    notification::{NewNotification, Notification},
    payment::{NewPayment, Payment, PaymentStatus},
    task::{NewTask, Task},
    user::{NewProfile, Profile, ProfileUpdate},
};

pub type StoreFuture<T> = BoxFuture<'static, Result<T>>;

#[cfg_attr(test, mockall::automock)]
pub trait UserStore: Send + Sync {
    fn get(&self, id: Uuid) -> StoreFuture<Option<Profile>>;
    /// Inserts the profile unless one with the same id exists; returns the stored row.
    fn upsert(&self, profile: NewProfile) -> StoreFuture<Profile>;
    fn update(&self, id: Uuid, changes: ProfileUpdate) -> StoreFuture<Profile>;
}

#[cfg_attr(test, mockall::automock)]
pub trait JobStore: Send + Sync {
    fn insert(&self, job: NewJob) -> StoreFuture<Job>;
    fn update(&self, id: Uuid, changes: JobUpdate) -> StoreFuture<Job>;
    fn set_status(&self, id: Uuid, status: JobStatus) -> StoreFuture<Job>;
    fn get(&self, id: Uuid) -> StoreFuture<Option<Job>>;
    /// Active listings, newest first.
    fn list_active(&self) -> StoreFuture<Vec<Job>>;
    fn list_by_employer(&self, employer_id: Uuid) -> StoreFuture<Vec<EmployerJob>>;
    /// Closes active listings whose deadline is before `today`.
    fn close_expired(&self, today: NaiveDate) -> StoreFuture<u64>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ApplicationStore: Send + Sync {
    fn insert(&self, application: NewApplication) -> StoreFuture<Application>;
    fn get(&self, id: Uuid) -> StoreFuture<Option<ApplicationDetail>>;
    fn find(&self, job_id: Uuid, applicant_id: Uuid) -> StoreFuture<Option<Application>>;
    fn list_for_applicant(&self, applicant_id: Uuid) -> StoreFuture<Vec<ApplicationDetail>>;
    fn list_for_employer(&self, employer_id: Uuid) -> StoreFuture<Vec<ApplicationDetail>>;
    fn update_status(&self, id: Uuid, change: StatusChange) -> StoreFuture<Application>;
}

#[cfg_attr(test, mockall::automock)]
pub trait MessageStore: Send + Sync {
    fn insert(&self, message: CreateMessage) -> StoreFuture<Message>;
    /// Both directions between the pair, oldest first.
    fn conversation(&self, user_id: Uuid, contact_id: Uuid) -> StoreFuture<Vec<Message>>;
    fn contacts(&self, user_id: Uuid) -> StoreFuture<Vec<Contact>>;
    /// Flags everything `sender_id` sent to `receiver_id` as read.
    fn mark_read(&self, receiver_id: Uuid, sender_id: Uuid) -> StoreFuture<u64>;
    fn unread_count(&self, user_id: Uuid) -> StoreFuture<i64>;
}

#[cfg_attr(test, mockall::automock)]
pub trait NotificationStore: Send + Sync {
    fn insert(&self, notification: NewNotification) -> StoreFuture<Notification>;
    fn list(&self, user_id: Uuid, limit: i64) -> StoreFuture<Vec<Notification>>;
    fn mark_read(&self, user_id: Uuid, id: Uuid) -> StoreFuture<bool>;
    fn mark_all_read(&self, user_id: Uuid) -> StoreFuture<u64>;
    fn unread_count(&self, user_id: Uuid) -> StoreFuture<i64>;
}

#[cfg_attr(test, mockall::automock)]
pub trait SavedJobStore: Send + Sync {
    fn is_saved(&self, user_id: Uuid, job_id: Uuid) -> StoreFuture<bool>;
    fn save(&self, user_id: Uuid, job_id: Uuid) -> StoreFuture<()>;
    fn unsave(&self, user_id: Uuid, job_id: Uuid) -> StoreFuture<()>;
    fn list(&self, user_id: Uuid) -> StoreFuture<Vec<Job>>;
    fn count(&self, user_id: Uuid) -> StoreFuture<i64>;
}

#[cfg_attr(test, mockall::automock)]
pub trait CalendarStore: Send + Sync {
    fn insert(&self, event: NewCalendarEvent) -> StoreFuture<CalendarEvent>;
    /// Events with `from <= event_date <= to`, ordered by date and time.
    fn list_between(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> StoreFuture<Vec<CalendarEvent>>;
    fn delete(&self, user_id: Uuid, id: Uuid) -> StoreFuture<bool>;
}

#[cfg_attr(test, mockall::automock)]
pub trait PaymentStore: Send + Sync {
    fn insert(&self, payment: NewPayment) -> StoreFuture<Payment>;
    fn list(&self, user_id: Uuid) -> StoreFuture<Vec<Payment>>;
    fn find_by_reference(&self, reference: String) -> StoreFuture<Option<Payment>>;
    /// Moves a payment out of `pending`; `None` when it was already settled.
    fn settle_pending(&self, id: Uuid, status: PaymentStatus) -> StoreFuture<Option<Payment>>;
}

#[cfg_attr(test, mockall::automock)]
pub trait TaskStore: Send + Sync {
    fn insert(&self, task: NewTask) -> StoreFuture<Task>;
    fn list(&self, owner_id: Uuid, pending_only: bool) -> StoreFuture<Vec<Task>>;
    fn toggle(&self, owner_id: Uuid, id: Uuid) -> StoreFuture<Option<Task>>;
    fn delete(&self, owner_id: Uuid, id: Uuid) -> StoreFuture<bool>;
}

/// Every collection handle the services need.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub jobs: Arc<dyn JobStore>,
    pub applications: Arc<dyn ApplicationStore>,
    pub messages: Arc<dyn MessageStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub saved_jobs: Arc<dyn SavedJobStore>,
    pub calendar: Arc<dyn CalendarStore>,
    pub payments: Arc<dyn PaymentStore>,
    pub tasks: Arc<dyn TaskStore>,
}

impl Stores {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        use postgres::*;

        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            jobs: Arc::new(PgJobStore::new(pool.clone())),
            applications: Arc::new(PgApplicationStore::new(pool.clone())),
            messages: Arc::new(PgMessageStore::new(pool.clone())),
            notifications: Arc::new(PgNotificationStore::new(pool.clone())),
            saved_jobs: Arc::new(PgSavedJobStore::new(pool.clone())),
            calendar: Arc::new(PgCalendarStore::new(pool.clone())),
            payments: Arc::new(PgPaymentStore::new(pool.clone())),
            tasks: Arc::new(PgTaskStore::new(pool)),
        }
    }
}

#[cfg(test)]
impl Stores {
    /// Bundle of mocks with no expectations; tests replace the ones they use.
    pub(crate) fn mocked() -> Self {
        Self {
            users: Arc::new(MockUserStore::new()),
            jobs: Arc::new(MockJobStore::new()),
            applications: Arc::new(MockApplicationStore::new()),
            messages: Arc::new(MockMessageStore::new()),
            notifications: Arc::new(MockNotificationStore::new()),
            saved_jobs: Arc::new(MockSavedJobStore::new()),
            calendar: Arc::new(MockCalendarStore::new()),
            payments: Arc::new(MockPaymentStore::new()),
            tasks: Arc::new(MockTaskStore::new()),
        }
    }
}

/// Wraps an already-computed value as a store future.
#[cfg(test)]
pub(crate) fn ready<T: Send + 'static>(value: Result<T>) -> StoreFuture<T> {
    Box::pin(async move { value })
}
