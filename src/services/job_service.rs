use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::job::{EmployerJob, Job, JobStatus, JobType, JobUpdate, NewJob};
use crate::models::user::Role;
use crate::store::JobStore;

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub job_type: Option<JobType>,
    pub location: Option<String>,
    pub min_salary: Option<i64>,
    pub urgent_only: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSort {
    #[default]
    Newest,
    SalaryHigh,
    SalaryLow,
    Deadline,
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// True when the term appears in the title, company, location or any skill.
pub fn matches_search(job: &Job, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    contains_ci(&job.title, &term)
        || contains_ci(&job.company, &term)
        || contains_ci(&job.location, &term)
        || job.skills.iter().any(|s| contains_ci(s, &term))
}

impl JobFilter {
    pub fn matches(&self, job: &Job) -> bool {
        if let Some(term) = &self.search {
            if !matches_search(job, term) {
                return false;
            }
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if !job.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(job_type) = self.job_type {
            if job.job_type != job_type {
                return false;
            }
        }
        if let Some(location) = self.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            if !contains_ci(&job.location, &location.to_lowercase()) {
                return false;
            }
        }
        if let Some(min) = self.min_salary {
            // a listing qualifies if its range reaches the requested minimum
            let top = job.salary_max.or(job.salary_min);
            if top.map(|t| t < min).unwrap_or(true) {
                return false;
            }
        }
        if self.urgent_only && !job.is_urgent {
            return false;
        }
        true
    }
}

pub fn filter_jobs(jobs: Vec<Job>, filter: &JobFilter) -> Vec<Job> {
    jobs.into_iter().filter(|j| filter.matches(j)).collect()
}

pub fn sort_jobs(jobs: &mut [Job], sort: JobSort) {
    match sort {
        JobSort::Newest => jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        JobSort::SalaryHigh => jobs.sort_by(|a, b| {
            let top = |j: &Job| j.salary_max.or(j.salary_min).unwrap_or(i64::MIN);
            top(b).cmp(&top(a))
        }),
        JobSort::SalaryLow => jobs.sort_by(|a, b| {
            let bottom = |j: &Job| j.salary_min.or(j.salary_max).unwrap_or(i64::MAX);
            bottom(a).cmp(&bottom(b))
        }),
        // listings without a deadline go last
        JobSort::Deadline => jobs.sort_by_key(|j| (j.deadline.is_none(), j.deadline)),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationCluster {
    pub location: String,
    pub job_count: usize,
    pub urgent_count: usize,
    pub jobs: Vec<MapPin>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapPin {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub is_urgent: bool,
}

/// Groups listings by location (case-insensitive), largest clusters first.
pub fn group_by_location(jobs: &[Job]) -> Vec<LocationCluster> {
    let mut clusters: BTreeMap<String, LocationCluster> = BTreeMap::new();
    for job in jobs {
        let key = job.location.trim().to_lowercase();
        let cluster = clusters.entry(key).or_insert_with(|| LocationCluster {
            location: job.location.trim().to_string(),
            job_count: 0,
            urgent_count: 0,
            jobs: Vec::new(),
        });
        cluster.job_count += 1;
        if job.is_urgent {
            cluster.urgent_count += 1;
        }
        cluster.jobs.push(MapPin {
            id: job.id,
            title: job.title.clone(),
            company: job.company.clone(),
            is_urgent: job.is_urgent,
        });
    }
    let mut out: Vec<LocationCluster> = clusters.into_values().collect();
    out.sort_by(|a, b| b.job_count.cmp(&a.job_count));
    out
}

#[derive(Clone)]
pub struct JobService {
    jobs: Arc<dyn JobStore>,
}

impl JobService {
    pub fn new(jobs: Arc<dyn JobStore>) -> Self {
        Self { jobs }
    }

    pub async fn create(&self, employer: &CurrentUser, job: NewJob) -> Result<Job> {
        employer.require_role(Role::Employer)?;
        validate_salary(job.salary_min, job.salary_max)?;
        let job = NewJob {
            employer_id: employer.id,
            ..job
        };
        let created = self.jobs.insert(job).await?;
        tracing::info!(job_id = %created.id, employer_id = %employer.id, "job posted");
        Ok(created)
    }

    /// Loads a listing and checks the caller owns it.
    pub async fn owned(&self, employer: &CurrentUser, id: Uuid) -> Result<Job> {
        employer.require_role(Role::Employer)?;
        let job = self
            .jobs
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Job not found".into()))?;
        if job.employer_id != employer.id {
            return Err(Error::Forbidden("You do not own this job".into()));
        }
        Ok(job)
    }

    pub async fn update(&self, employer: &CurrentUser, id: Uuid, changes: JobUpdate) -> Result<Job> {
        let current = self.owned(employer, id).await?;
        validate_salary(
            changes.salary_min.or(current.salary_min),
            changes.salary_max.or(current.salary_max),
        )?;
        self.jobs.update(id, changes).await
    }

    pub async fn set_status(&self, employer: &CurrentUser, id: Uuid, status: JobStatus) -> Result<Job> {
        let current = self.owned(employer, id).await?;
        if current.status == status {
            return Ok(current);
        }
        let job = self.jobs.set_status(id, status).await?;
        tracing::info!(job_id = %id, from = %current.status, to = %status, "job status changed");
        Ok(job)
    }

    /// Listings are never purged; closing is the delete.
    pub async fn close(&self, employer: &CurrentUser, id: Uuid) -> Result<Job> {
        self.set_status(employer, id, JobStatus::Closed).await
    }

    pub async fn get_public(&self, id: Uuid) -> Result<Job> {
        match self.jobs.get(id).await? {
            Some(job) if job.status == JobStatus::Active => Ok(job),
            _ => Err(Error::NotFound("Job not found".into())),
        }
    }

    pub async fn browse(&self, filter: &JobFilter, sort: JobSort) -> Result<Vec<Job>> {
        let active = self.jobs.list_active().await?;
        let mut jobs = filter_jobs(active, filter);
        sort_jobs(&mut jobs, sort);
        Ok(jobs)
    }

    pub async fn employer_jobs(&self, employer: &CurrentUser) -> Result<Vec<EmployerJob>> {
        employer.require_role(Role::Employer)?;
        self.jobs.list_by_employer(employer.id).await
    }

    pub async fn map(&self, filter: &JobFilter) -> Result<Vec<LocationCluster>> {
        let jobs = filter_jobs(self.jobs.list_active().await?, filter);
        Ok(group_by_location(&jobs))
    }

    pub async fn close_expired(&self) -> Result<u64> {
        let closed = self
            .jobs
            .close_expired(crate::utils::time::today_in_kenya())
            .await?;
        if closed > 0 {
            tracing::info!(closed, "closed listings past their deadline");
        }
        Ok(closed)
    }
}

fn validate_salary(min: Option<i64>, max: Option<i64>) -> Result<()> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(Error::BadRequest(
                "salary_min cannot be greater than salary_max".into(),
            ));
        }
    }
    if min.map(|v| v < 0).unwrap_or(false) || max.map(|v| v < 0).unwrap_or(false) {
        return Err(Error::BadRequest("Salary cannot be negative".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::sample_job;
    use crate::store::{ready, MockJobStore};
    use chrono::{Duration, NaiveDate, Utc};

    fn employer(id: Uuid) -> CurrentUser {
        CurrentUser {
            id,
            role: Role::Employer,
            email: None,
            name: None,
            token: "t".into(),
            expires_at: 0,
        }
    }

    fn catalogue() -> Vec<Job> {
        vec![
            sample_job("Rust Engineer", "Safari Tech", "Nairobi", &["Rust", "Postgres"]),
            sample_job("Accountant", "Kilimo Bank", "Kisumu", &["Excel", "IFRS"]),
            sample_job("Driver", "Mombasa Logistics", "Mombasa", &["Driving"]),
            sample_job("Data Analyst", "Rustic Farms", "Eldoret", &["SQL", "Python"]),
        ]
    }

    #[test]
    fn search_matches_title_company_location_or_skill() {
        let jobs = catalogue();
        let filter = JobFilter {
            search: Some("rust".into()),
            ..Default::default()
        };
        let expected: Vec<Uuid> = jobs
            .iter()
            .filter(|j| {
                j.title.to_lowercase().contains("rust")
                    || j.company.to_lowercase().contains("rust")
                    || j.location.to_lowercase().contains("rust")
                    || j.skills.iter().any(|s| s.to_lowercase().contains("rust"))
            })
            .map(|j| j.id)
            .collect();

        let got: Vec<Uuid> = filter_jobs(jobs, &filter).iter().map(|j| j.id).collect();
        assert_eq!(got, expected);
        assert_eq!(got.len(), 2);
    }

    #[test]
    fn search_covers_location_and_skills() {
        let jobs = catalogue();
        let by_location = JobFilter {
            search: Some("KISUMU".into()),
            ..Default::default()
        };
        assert_eq!(filter_jobs(jobs.clone(), &by_location)[0].title, "Accountant");

        let by_skill = JobFilter {
            search: Some("python".into()),
            ..Default::default()
        };
        assert_eq!(filter_jobs(jobs.clone(), &by_skill)[0].title, "Data Analyst");

        let blank = JobFilter {
            search: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(filter_jobs(jobs, &blank).len(), 4);
    }

    #[test]
    fn structured_filters_combine() {
        let mut jobs = catalogue();
        jobs[0].is_urgent = true;
        jobs[0].salary_min = Some(150_000);
        jobs[0].salary_max = Some(250_000);
        jobs[1].salary_max = Some(80_000);
        jobs[2].job_type = JobType::Casual;

        let urgent = JobFilter {
            urgent_only: true,
            ..Default::default()
        };
        assert_eq!(filter_jobs(jobs.clone(), &urgent).len(), 1);

        let paid = JobFilter {
            min_salary: Some(100_000),
            ..Default::default()
        };
        let paid_titles: Vec<String> = filter_jobs(jobs.clone(), &paid)
            .into_iter()
            .map(|j| j.title)
            .collect();
        assert_eq!(paid_titles, vec!["Rust Engineer"]);

        let casual = JobFilter {
            job_type: Some(JobType::Casual),
            ..Default::default()
        };
        assert_eq!(filter_jobs(jobs, &casual)[0].title, "Driver");
    }

    #[test]
    fn sorts_by_salary_and_deadline() {
        let mut jobs = catalogue();
        jobs[0].salary_max = Some(200_000);
        jobs[1].salary_max = Some(90_000);
        jobs[3].salary_min = Some(120_000);
        jobs[1].deadline = NaiveDate::from_ymd_opt(2025, 5, 1);
        jobs[2].deadline = NaiveDate::from_ymd_opt(2025, 4, 1);

        let mut by_salary = jobs.clone();
        sort_jobs(&mut by_salary, JobSort::SalaryHigh);
        assert_eq!(by_salary[0].title, "Rust Engineer");
        assert_eq!(by_salary[1].title, "Data Analyst");
        assert_eq!(by_salary[3].title, "Driver");

        let mut by_deadline = jobs.clone();
        sort_jobs(&mut by_deadline, JobSort::Deadline);
        assert_eq!(by_deadline[0].title, "Driver");
        assert_eq!(by_deadline[1].title, "Accountant");

        let mut newest = jobs;
        newest[2].created_at = Utc::now() + Duration::minutes(5);
        sort_jobs(&mut newest, JobSort::Newest);
        assert_eq!(newest[0].title, "Driver");
    }

    #[test]
    fn groups_locations_case_insensitively() {
        let mut jobs = catalogue();
        jobs.push(sample_job("Chef", "Java House", "nairobi ", &[]));
        jobs[4].is_urgent = true;
        let clusters = group_by_location(&jobs);
        assert_eq!(clusters[0].job_count, 2);
        assert_eq!(clusters[0].urgent_count, 1);
        assert_eq!(clusters.len(), 4);
    }

    #[tokio::test]
    async fn update_rejects_foreign_listing() {
        let owner = Uuid::new_v4();
        let mut job = sample_job("Cashier", "Naivas", "Nakuru", &[]);
        job.employer_id = owner;
        let job_id = job.id;

        let mut store = MockJobStore::new();
        store
            .expect_get()
            .returning(move |_| ready(Ok(Some(job.clone()))));
        store.expect_update().never();

        let service = JobService::new(Arc::new(store));
        let intruder = employer(Uuid::new_v4());
        let result = service.update(&intruder, job_id, JobUpdate::default()).await;
        assert!(matches!(result, Err(Error::Forbidden(_))));
    }

    #[tokio::test]
    async fn create_stamps_employer_and_checks_salary() {
        let me = Uuid::new_v4();
        let mut store = MockJobStore::new();
        store
            .expect_insert()
            .withf(move |job| job.employer_id == me)
            .times(1)
            .returning(|new| {
                let mut job = sample_job(&new.title, &new.company, &new.location, &[]);
                job.employer_id = new.employer_id;
                ready(Ok(job))
            });
        let service = JobService::new(Arc::new(store));

        let draft = NewJob {
            employer_id: Uuid::nil(),
            title: "Nurse".into(),
            company: "Aga Khan".into(),
            location: "Nairobi".into(),
            job_type: JobType::FullTime,
            category: "Health".into(),
            salary_min: Some(90_000),
            salary_max: Some(60_000),
            skills: vec![],
            description: "Ward nurse".into(),
            requirements: None,
            deadline: None,
            status: JobStatus::Active,
            is_urgent: false,
        };
        let bad = service.create(&employer(me), draft.clone()).await;
        assert!(matches!(bad, Err(Error::BadRequest(_))));

        let good = NewJob {
            salary_max: Some(120_000),
            ..draft
        };
        let created = service.create(&employer(me), good).await.unwrap();
        assert_eq!(created.employer_id, me);
    }
}
