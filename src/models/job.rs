use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

text_enum!(JobType {
    FullTime => "full_time",
    PartTime => "part_time",
    Contract => "contract",
    Internship => "internship",
    Casual => "casual",
});

text_enum!(JobStatus {
    Active => "active",
    Closed => "closed",
    Draft => "draft",
});

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    #[sqlx(try_from = "String")]
    pub job_type: JobType,
    pub category: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub skills: Vec<String>,
    pub description: String,
    pub requirements: Option<String>,
    pub deadline: Option<NaiveDate>,
    #[sqlx(try_from = "String")]
    pub status: JobStatus,
    pub is_urgent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An employer's own listing together with how many people applied.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployerJob {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: Job,
    pub application_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub employer_id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: JobType,
    pub category: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub skills: Vec<String>,
    pub description: String,
    pub requirements: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: JobStatus,
    pub is_urgent: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub category: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub skills: Option<Vec<String>>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub is_urgent: Option<bool>,
}

#[cfg(test)]
pub(crate) fn sample_job(title: &str, company: &str, location: &str, skills: &[&str]) -> Job {
    Job {
        id: Uuid::new_v4(),
        employer_id: Uuid::new_v4(),
        title: title.to_string(),
        company: company.to_string(),
        location: location.to_string(),
        job_type: JobType::FullTime,
        category: "Technology".to_string(),
        salary_min: None,
        salary_max: None,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        description: format!("{} at {}", title, company),
        requirements: None,
        deadline: None,
        status: JobStatus::Active,
        is_urgent: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
