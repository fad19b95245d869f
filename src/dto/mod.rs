pub mod application_dto;
pub mod calendar_dto;
pub mod chatbot_dto;
pub mod job_dto;
pub mod message_dto;
pub mod payment_dto;
pub mod profile_dto;
pub mod task_dto;
