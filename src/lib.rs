pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod realtime;
pub mod routes;
pub mod services;
pub mod storage;
pub mod store;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::middleware::auth::SessionRegistry;
use crate::realtime::ChangeFeed;
use crate::services::{
    application_service::ApplicationService, calendar_service::CalendarService,
    dashboard_service::DashboardService, job_service::JobService,
    message_service::MessageService, notification_service::NotificationService,
    payment_service::PaymentService, profile_service::ProfileService,
    saved_job_service::SavedJobService, task_service::TaskService,
};
use crate::storage::ObjectStore;
use crate::store::Stores;

/// Request-time settings taken from [`Config`] once at startup.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub jwt_secret: String,
    pub webhook_secret: String,
    pub max_upload_bytes: usize,
    /// Honour `X-Forwarded-For` when rate limiting.
    pub trust_proxy: bool,
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            webhook_secret: config.webhook_secret.clone(),
            max_upload_bytes: config.max_upload_bytes,
            trust_proxy: config.trust_proxy,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<AppSettings>,
    pub sessions: SessionRegistry,
    pub feed: ChangeFeed,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub saved_job_service: SavedJobService,
    pub message_service: MessageService,
    pub notification_service: NotificationService,
    pub calendar_service: CalendarService,
    pub profile_service: ProfileService,
    pub payment_service: PaymentService,
    pub task_service: TaskService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub fn new(settings: AppSettings, stores: Stores, storage: Arc<dyn ObjectStore>) -> Self {
        let feed = ChangeFeed::default();

        let notification_service =
            NotificationService::new(stores.notifications.clone(), feed.clone());
        let calendar_service = CalendarService::new(stores.calendar.clone());
        let job_service = JobService::new(stores.jobs.clone());
        let application_service = ApplicationService::new(
            stores.applications.clone(),
            stores.jobs.clone(),
            notification_service.clone(),
            calendar_service.clone(),
        );
        let saved_job_service = SavedJobService::new(stores.saved_jobs.clone());
        let message_service = MessageService::new(
            stores.messages.clone(),
            notification_service.clone(),
            feed.clone(),
        );
        let profile_service = ProfileService::new(stores.users.clone(), storage);
        let payment_service =
            PaymentService::new(stores.payments.clone(), notification_service.clone());
        let task_service = TaskService::new(stores.tasks.clone());
        let dashboard_service = DashboardService::new(stores);

        Self {
            settings: Arc::new(settings),
            sessions: SessionRegistry::default(),
            feed,
            job_service,
            application_service,
            saved_job_service,
            message_service,
            notification_service,
            calendar_service,
            profile_service,
            payment_service,
            task_service,
            dashboard_service,
        }
    }
}
