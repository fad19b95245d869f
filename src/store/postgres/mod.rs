//! sqlx-backed implementations of the store traits.

mod applications;
mod calendar;
mod jobs;
mod messages;
mod notifications;
mod payments;
mod saved_jobs;
mod tasks;
mod users;

pub use applications::PgApplicationStore;
pub use calendar::PgCalendarStore;
pub use jobs::PgJobStore;
pub use messages::PgMessageStore;
pub use notifications::PgNotificationStore;
pub use payments::PgPaymentStore;
pub use saved_jobs::PgSavedJobStore;
pub use tasks::PgTaskStore;
pub use users::PgUserStore;
