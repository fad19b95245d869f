use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

text_enum!(ApplicationStatus {
    Pending => "pending",
    Shortlisted => "shortlisted",
    Interview => "interview",
    Accepted => "accepted",
    Rejected => "rejected",
});

text_enum!(BadgeTone {
    Neutral => "neutral",
    Info => "info",
    Highlight => "highlight",
    Success => "success",
    Danger => "danger",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: &'static str,
    pub tone: BadgeTone,
}

impl ApplicationStatus {
    pub fn badge(&self) -> StatusBadge {
        let (label, tone) = match self {
            ApplicationStatus::Pending => ("Pending Review", BadgeTone::Neutral),
            ApplicationStatus::Shortlisted => ("Shortlisted", BadgeTone::Info),
            ApplicationStatus::Interview => ("Interview Scheduled", BadgeTone::Highlight),
            ApplicationStatus::Accepted => ("Accepted", BadgeTone::Success),
            ApplicationStatus::Rejected => ("Not Selected", BadgeTone::Danger),
        };
        StatusBadge { label, tone }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub interview_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application joined with its job and applicant, as both dashboards show it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub application: Application,
    pub job_title: String,
    pub company: String,
    pub employer_id: Uuid,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_skills: Vec<String>,
    pub applicant_location: Option<String>,
    pub applicant_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub status: ApplicationStatus,
    pub interview_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[cfg(test)]
pub(crate) fn sample_detail(
    employer_id: Uuid,
    applicant_name: &str,
    status: ApplicationStatus,
) -> ApplicationDetail {
    let now = Utc::now();
    ApplicationDetail {
        application: Application {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            applicant_id: Uuid::new_v4(),
            status,
            cover_letter: None,
            resume_url: None,
            interview_date: None,
            notes: None,
            applied_at: now,
            updated_at: now,
        },
        job_title: "Backend Developer".into(),
        company: "Safari Tech".into(),
        employer_id,
        applicant_name: applicant_name.into(),
        applicant_email: format!("{}@example.co.ke", applicant_name.to_lowercase()),
        applicant_skills: vec!["Rust".into(), "SQL".into()],
        applicant_location: Some("Mombasa".into()),
        applicant_rating: Some(4.5),
    }
}
