pub mod applications;
pub mod calendar;
pub mod chatbot;
pub mod dashboard;
pub mod employer;
pub mod health;
pub mod jobs;
pub mod messages;
pub mod notifications;
pub mod payments;
pub mod profile;
pub mod saved_jobs;
pub mod tasks;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
    Router,
};

use crate::middleware::{
    auth::require_auth,
    rate_limit::{new_rps_state, rps_middleware},
};
use crate::AppState;

/// Full API surface. Signed-out endpoints and signed-in endpoints are rate
/// limited separately; the signed-in group rejects requests without a valid
/// bearer token.
pub fn router(state: AppState, api_rps: u32, public_rps: u32) -> Router {
    let trust_proxy = state.settings.trust_proxy;
    let base_routes = Router::new().route("/health", get(health::health));

    let public_api = Router::new()
        .route("/api/chatbot", post(chatbot::ask))
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/map", get(jobs::jobs_map))
        .route("/api/jobs/:id", get(jobs::get_job))
        .route("/api/profiles/:id", get(profile::get_profile))
        .route("/api/payments/plans", get(payments::list_plans))
        .route("/api/payments/callback", post(payments::callback))
        .layer(from_fn_with_state(new_rps_state(public_rps, trust_proxy), rps_middleware));

    let user_api = Router::new()
        .route("/api/auth/sign-out", post(profile::sign_out))
        .route("/api/dashboard", get(dashboard::dashboard))
        .route("/api/profile", get(profile::me).patch(profile::update_me))
        .route("/api/profile/resume", post(profile::upload_resume))
        .route("/api/profile/photo", post(profile::upload_photo))
        .route("/api/jobs/:id/view", get(jobs::get_job_for_user))
        .route("/api/jobs/:id/apply", post(jobs::apply))
        .route("/api/applications", get(applications::my_applications))
        .route("/api/applications/:id", get(applications::get_application))
        .route("/api/saved-jobs", get(saved_jobs::list_saved))
        .route("/api/saved-jobs/:id", post(saved_jobs::toggle_saved))
        .route("/api/messages/contacts", get(messages::contacts))
        .route("/api/messages", post(messages::send_message))
        .route("/api/messages/unread", get(messages::unread_count))
        .route("/api/messages/:id", get(messages::conversation))
        .route("/api/messages/:id/stream", get(messages::stream))
        .route("/api/notifications", get(notifications::list_notifications))
        .route("/api/notifications/unread", get(notifications::unread_count))
        .route("/api/notifications/read-all", post(notifications::mark_all_read))
        .route("/api/notifications/stream", get(notifications::stream))
        .route("/api/notifications/:id/read", post(notifications::mark_read))
        .route("/api/calendar", get(calendar::month))
        .route("/api/calendar/upcoming", get(calendar::upcoming))
        .route("/api/calendar/events", post(calendar::create_event))
        .route("/api/calendar/events/:id", delete(calendar::delete_event))
        .route("/api/payments", get(payments::history).post(payments::initiate))
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route("/api/tasks/:id", delete(tasks::delete_task))
        .route("/api/tasks/:id/toggle", post(tasks::toggle_task))
        .route("/api/employer/jobs", get(employer::my_jobs).post(employer::create_job))
        .route("/api/employer/jobs/:id", patch(employer::update_job))
        .route("/api/employer/jobs/:id/status", post(employer::set_job_status))
        .route("/api/employer/jobs/:id/close", post(employer::close_job))
        .route("/api/employer/applicants", get(employer::list_applicants))
        .route("/api/employer/applicants/export", get(employer::export_applicants))
        .route(
            "/api/employer/applications/:id/status",
            post(employer::update_application_status),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth))
        .layer(from_fn_with_state(new_rps_state(api_rps, trust_proxy), rps_middleware));

    base_routes
        .merge(public_api)
        .merge(user_api)
        .with_state(state)
}
