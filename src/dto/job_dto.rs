use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::job::{Job, JobStatus, JobType, JobUpdate, NewJob};
use crate::services::job_service::{JobFilter, JobSort};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 3, max = 120, message = "Title must be 3-120 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 120))]
    pub company: String,
    #[validate(length(min = 1, max = 120))]
    pub location: String,
    pub job_type: JobType,
    #[validate(length(min = 1, max = 60))]
    pub category: String,
    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,
    pub requirements: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub is_urgent: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateJobPayload {
    #[validate(length(min = 3, max = 120))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub company: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    #[validate(length(min = 1, max = 60))]
    pub category: Option<String>,
    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    pub skills: Option<Vec<String>>,
    #[validate(length(min = 10))]
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub is_urgent: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusPayload {
    pub status: JobStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct JobListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub job_type: Option<JobType>,
    pub location: Option<String>,
    pub min_salary: Option<i64>,
    pub urgent_only: Option<bool>,
    pub sort: Option<JobSort>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobDetailResponse {
    #[serde(flatten)]
    pub job: Job,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_saved: Option<bool>,
}

fn clean_skills(skills: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(skills.len());
    for skill in skills {
        let skill = skill.trim();
        if !skill.is_empty() && !out.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            out.push(skill.to_string());
        }
    }
    out
}

impl From<CreateJobPayload> for NewJob {
    fn from(p: CreateJobPayload) -> Self {
        Self {
            // stamped by the service from the caller
            employer_id: uuid::Uuid::nil(),
            title: p.title.trim().to_string(),
            company: p.company.trim().to_string(),
            location: p.location.trim().to_string(),
            job_type: p.job_type,
            category: p.category.trim().to_string(),
            salary_min: p.salary_min,
            salary_max: p.salary_max,
            skills: clean_skills(p.skills),
            description: p.description,
            requirements: p.requirements,
            deadline: p.deadline,
            status: p.status.unwrap_or(JobStatus::Active),
            is_urgent: p.is_urgent,
        }
    }
}

impl From<UpdateJobPayload> for JobUpdate {
    fn from(p: UpdateJobPayload) -> Self {
        Self {
            title: p.title,
            company: p.company,
            location: p.location,
            job_type: p.job_type,
            category: p.category,
            salary_min: p.salary_min,
            salary_max: p.salary_max,
            skills: p.skills.map(clean_skills),
            description: p.description,
            requirements: p.requirements,
            deadline: p.deadline,
            is_urgent: p.is_urgent,
        }
    }
}

impl JobListQuery {
    pub fn into_parts(self) -> (JobFilter, JobSort) {
        let filter = JobFilter {
            search: self.search,
            category: self.category,
            job_type: self.job_type,
            location: self.location,
            min_salary: self.min_salary,
            urgent_only: self.urgent_only.unwrap_or(false),
        };
        (filter, self.sort.unwrap_or_default())
    }
}
