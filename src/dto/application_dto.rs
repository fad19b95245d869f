use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::{
    Application, ApplicationDetail, ApplicationStatus, StatusBadge, StatusChange,
};
use crate::services::application_service::{ApplicantFilter, ApplicantSort};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ApplyPayload {
    #[validate(length(max = 5000, message = "Cover letter is too long"))]
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStatusPayload {
    pub status: ApplicationStatus,
    pub interview_date: Option<DateTime<Utc>>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl From<UpdateStatusPayload> for StatusChange {
    fn from(p: UpdateStatusPayload) -> Self {
        Self {
            status: p.status,
            interview_date: p.interview_date,
            notes: p.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MyApplicationsQuery {
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApplicantsQuery {
    pub status: Option<ApplicationStatus>,
    pub job_id: Option<Uuid>,
    pub search: Option<String>,
    pub sort: Option<ApplicantSort>,
}

impl ApplicantsQuery {
    pub fn into_parts(self) -> (ApplicantFilter, ApplicantSort) {
        (
            ApplicantFilter {
                status: self.status,
                job_id: self.job_id,
                search: self.search,
            },
            self.sort.unwrap_or_default(),
        )
    }
}

/// Application with the badge the UI renders for its status.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationResponse {
    #[serde(flatten)]
    pub detail: ApplicationDetail,
    pub badge: StatusBadge,
}

impl From<ApplicationDetail> for ApplicationResponse {
    fn from(detail: ApplicationDetail) -> Self {
        let badge = detail.application.status.badge();
        Self { detail, badge }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSummary {
    #[serde(flatten)]
    pub application: Application,
    pub badge: StatusBadge,
}

impl From<Application> for ApplicationSummary {
    fn from(application: Application) -> Self {
        let badge = application.status.badge();
        Self { application, badge }
    }
}
