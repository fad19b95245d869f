pub mod application_service;
pub mod calendar_service;
pub mod chatbot_service;
pub mod dashboard_service;
pub mod export_service;
pub mod job_service;
pub mod message_service;
pub mod messaging_center;
pub mod notification_service;
pub mod payment_service;
pub mod profile_service;
pub mod saved_job_service;
pub mod task_service;
