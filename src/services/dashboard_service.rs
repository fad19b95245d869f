//! Role-branched dashboard summaries.
//!
//! Each figure comes from an independent query; a failing query is logged
//! and contributes an empty value instead of failing the whole dashboard.

use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::middleware::auth::CurrentUser;
use crate::models::application::{ApplicationDetail, ApplicationStatus};
use crate::models::job::{Job, JobStatus};
use crate::models::user::{Profile, Role};
use crate::store::Stores;

const RECENT_LIMIT: usize = 5;
const RECOMMENDED_LIMIT: usize = 6;

#[derive(Debug, Clone, Serialize)]
pub struct EmployerDashboard {
    pub active_jobs: usize,
    pub closed_jobs: usize,
    pub draft_jobs: usize,
    pub total_applications: usize,
    pub applications_by_status: BTreeMap<ApplicationStatus, usize>,
    pub recent_applicants: Vec<ApplicationDetail>,
    pub unread_messages: i64,
    pub unread_notifications: i64,
    pub pending_tasks: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeekerDashboard {
    pub total_applications: usize,
    pub applications_by_status: BTreeMap<ApplicationStatus, usize>,
    pub saved_jobs: i64,
    pub unread_messages: i64,
    pub unread_notifications: i64,
    pub profile_completion: u8,
    pub recommended_jobs: Vec<Job>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Dashboard {
    Employer(EmployerDashboard),
    JobSeeker(SeekerDashboard),
}

/// Counts per status with every status present, zero when absent.
pub fn count_by_status(details: &[ApplicationDetail]) -> BTreeMap<ApplicationStatus, usize> {
    let mut counts: BTreeMap<ApplicationStatus, usize> =
        ApplicationStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for detail in details {
        *counts.entry(detail.application.status).or_default() += 1;
    }
    counts
}

/// Active jobs sharing at least one skill with the profile, most overlap first,
/// excluding jobs already applied to.
pub fn recommend(profile: &Profile, jobs: Vec<Job>, applied: &HashSet<uuid::Uuid>) -> Vec<Job> {
    let skills: HashSet<String> = profile.skills.iter().map(|s| s.to_lowercase()).collect();
    if skills.is_empty() {
        return Vec::new();
    }
    let mut scored: Vec<(usize, Job)> = jobs
        .into_iter()
        .filter(|j| j.status == JobStatus::Active && !applied.contains(&j.id))
        .filter_map(|j| {
            let overlap = j
                .skills
                .iter()
                .filter(|s| skills.contains(&s.to_lowercase()))
                .count();
            (overlap > 0).then_some((overlap, j))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.created_at.cmp(&a.1.created_at)));
    scored
        .into_iter()
        .take(RECOMMENDED_LIMIT)
        .map(|(_, job)| job)
        .collect()
}

async fn or_empty<T: Default>(what: &str, fut: impl Future<Output = Result<T>>) -> T {
    match fut.await {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = %e, query = what, "dashboard query failed");
            T::default()
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    stores: Stores,
}

impl DashboardService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn for_user(&self, user: &CurrentUser) -> Dashboard {
        match user.role {
            Role::Employer => Dashboard::Employer(self.employer(user).await),
            Role::JobSeeker => Dashboard::JobSeeker(self.seeker(user).await),
        }
    }

    async fn employer(&self, user: &CurrentUser) -> EmployerDashboard {
        let s = &self.stores;
        let (jobs, applications, unread_messages, unread_notifications, tasks) = tokio::join!(
            or_empty("employer_jobs", s.jobs.list_by_employer(user.id)),
            or_empty("employer_applications", s.applications.list_for_employer(user.id)),
            or_empty("unread_messages", s.messages.unread_count(user.id)),
            or_empty("unread_notifications", s.notifications.unread_count(user.id)),
            or_empty("pending_tasks", s.tasks.list(user.id, true)),
        );

        let count_status = |status: JobStatus| jobs.iter().filter(|j| j.job.status == status).count();
        let mut recent = applications.clone();
        recent.sort_by(|a, b| b.application.applied_at.cmp(&a.application.applied_at));
        recent.truncate(RECENT_LIMIT);

        EmployerDashboard {
            active_jobs: count_status(JobStatus::Active),
            closed_jobs: count_status(JobStatus::Closed),
            draft_jobs: count_status(JobStatus::Draft),
            total_applications: applications.len(),
            applications_by_status: count_by_status(&applications),
            recent_applicants: recent,
            unread_messages,
            unread_notifications,
            pending_tasks: tasks.len(),
        }
    }

    async fn seeker(&self, user: &CurrentUser) -> SeekerDashboard {
        let s = &self.stores;
        let (applications, saved_jobs, unread_messages, unread_notifications, profile, active) = tokio::join!(
            or_empty("seeker_applications", s.applications.list_for_applicant(user.id)),
            or_empty("saved_jobs", s.saved_jobs.count(user.id)),
            or_empty("unread_messages", s.messages.unread_count(user.id)),
            or_empty("unread_notifications", s.notifications.unread_count(user.id)),
            or_empty("profile", s.users.get(user.id)),
            or_empty("active_jobs", s.jobs.list_active()),
        );

        let applied: HashSet<uuid::Uuid> = applications.iter().map(|d| d.application.job_id).collect();
        let (profile_completion, recommended_jobs) = match &profile {
            Some(p) => (p.completion(), recommend(p, active, &applied)),
            None => (0, Vec::new()),
        };

        SeekerDashboard {
            total_applications: applications.len(),
            applications_by_status: count_by_status(&applications),
            saved_jobs,
            unread_messages,
            unread_notifications,
            profile_completion,
            recommended_jobs,
        }
    }
}
