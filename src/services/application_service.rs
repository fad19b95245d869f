use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::middleware::auth::CurrentUser;
use crate::models::application::{
    Application, ApplicationDetail, ApplicationStatus, NewApplication, StatusChange,
};
use crate::models::calendar_event::{EventKind, NewCalendarEvent};
use crate::models::job::JobStatus;
use crate::models::notification::NotificationKind;
use crate::models::user::Role;
use crate::services::calendar_service::CalendarService;
use crate::services::notification_service::NotificationService;
use crate::store::{ApplicationStore, JobStore};
use crate::utils::time::eat;

#[derive(Debug, Clone, Default)]
pub struct ApplicantFilter {
    pub status: Option<ApplicationStatus>,
    pub job_id: Option<Uuid>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicantSort {
    #[default]
    Newest,
    Oldest,
    Name,
}

impl ApplicantFilter {
    pub fn matches(&self, detail: &ApplicationDetail) -> bool {
        if let Some(status) = self.status {
            if detail.application.status != status {
                return false;
            }
        }
        if let Some(job_id) = self.job_id {
            if detail.application.job_id != job_id {
                return false;
            }
        }
        let Some(term) = self
            .search
            .as_deref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
        else {
            return true;
        };
        detail.applicant_name.to_lowercase().contains(&term)
            || detail.applicant_email.to_lowercase().contains(&term)
            || detail.job_title.to_lowercase().contains(&term)
            || detail
                .applicant_skills
                .iter()
                .any(|s| s.to_lowercase().contains(&term))
    }
}

pub fn filter_applicants(
    mut details: Vec<ApplicationDetail>,
    filter: &ApplicantFilter,
    sort: ApplicantSort,
) -> Vec<ApplicationDetail> {
    details.retain(|d| filter.matches(d));
    match sort {
        ApplicantSort::Newest => {
            details.sort_by(|a, b| b.application.applied_at.cmp(&a.application.applied_at))
        }
        ApplicantSort::Oldest => {
            details.sort_by(|a, b| a.application.applied_at.cmp(&b.application.applied_at))
        }
        ApplicantSort::Name => details.sort_by(|a, b| {
            a.applicant_name
                .to_lowercase()
                .cmp(&b.applicant_name.to_lowercase())
        }),
    }
    details
}

#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationStore>,
    jobs: Arc<dyn JobStore>,
    notifications: NotificationService,
    calendar: CalendarService,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationStore>,
        jobs: Arc<dyn JobStore>,
        notifications: NotificationService,
        calendar: CalendarService,
    ) -> Self {
        Self {
            applications,
            jobs,
            notifications,
            calendar,
        }
    }

    pub async fn apply(
        &self,
        seeker: &CurrentUser,
        job_id: Uuid,
        cover_letter: Option<String>,
        resume_url: Option<String>,
    ) -> Result<Application> {
        seeker.require_role(Role::JobSeeker)?;
        let job = match self.jobs.get(job_id).await? {
            Some(job) if job.status == JobStatus::Active => job,
            Some(_) => return Err(Error::BadRequest("This job is no longer accepting applications".into())),
            None => return Err(Error::NotFound("Job not found".into())),
        };
        if self.applications.find(job_id, seeker.id).await?.is_some() {
            return Err(Error::Conflict("You have already applied for this job".into()));
        }

        let application = self
            .applications
            .insert(NewApplication {
                job_id,
                applicant_id: seeker.id,
                cover_letter: cover_letter.filter(|c| !c.trim().is_empty()),
                resume_url,
            })
            .await?;
        tracing::info!(application_id = %application.id, %job_id, applicant_id = %seeker.id, "application submitted");

        let who = seeker.name.clone().unwrap_or_else(|| "A candidate".to_string());
        self.notifications
            .notify_quietly(
                job.employer_id,
                NotificationKind::Application,
                "New application",
                format!("{} applied for {}", who, job.title),
            )
            .await;
        Ok(application)
    }

    pub async fn my_applications(
        &self,
        seeker: &CurrentUser,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<ApplicationDetail>> {
        let mut list = self.applications.list_for_applicant(seeker.id).await?;
        if let Some(status) = status {
            list.retain(|d| d.application.status == status);
        }
        Ok(list)
    }

    pub async fn applicants(
        &self,
        employer: &CurrentUser,
        filter: &ApplicantFilter,
        sort: ApplicantSort,
    ) -> Result<Vec<ApplicationDetail>> {
        employer.require_role(Role::Employer)?;
        let all = self.applications.list_for_employer(employer.id).await?;
        Ok(filter_applicants(all, filter, sort))
    }

    /// Loads an application visible to the caller: its applicant or the job's employer.
    pub async fn get(&self, user: &CurrentUser, id: Uuid) -> Result<ApplicationDetail> {
        let detail = self
            .applications
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".into()))?;
        if detail.application.applicant_id != user.id && detail.employer_id != user.id {
            return Err(Error::NotFound("Application not found".into()));
        }
        Ok(detail)
    }

    pub async fn update_status(
        &self,
        employer: &CurrentUser,
        id: Uuid,
        change: StatusChange,
    ) -> Result<Application> {
        employer.require_role(Role::Employer)?;
        let detail = self
            .applications
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Application not found".into()))?;
        if detail.employer_id != employer.id {
            return Err(Error::Forbidden("You do not own this job".into()));
        }

        let updated = self.applications.update_status(id, change.clone()).await?;
        tracing::info!(
            application_id = %id,
            from = %detail.application.status,
            to = %updated.status,
            "application status changed"
        );

        let before = &detail.application;
        let booked = match (updated.status, updated.interview_date) {
            (ApplicationStatus::Interview, Some(at)) => {
                let moved_in = before.status != ApplicationStatus::Interview;
                (moved_in || before.interview_date != Some(at)).then_some(at)
            }
            _ => None,
        };

        // independent writes; a failure here does not undo the status change
        let applicant_id = before.applicant_id;
        self.notifications
            .notify_quietly(
                applicant_id,
                NotificationKind::StatusChange,
                "Application update",
                status_message(&detail, &updated, booked),
            )
            .await;

        if let Some(at) = booked {
            let local = at.with_timezone(&eat());
            let event = NewCalendarEvent {
                user_id: applicant_id,
                title: format!("Interview: {} at {}", detail.job_title, detail.company),
                description: change.notes.clone(),
                event_date: local.date_naive(),
                start_time: Some(local.time()),
                location: None,
                kind: EventKind::Interview,
            };
            if let Err(e) = self.calendar.create(event).await {
                tracing::error!(error = %e, application_id = %id, "failed to add interview to calendar");
            }
        }
        Ok(updated)
    }
}

/// `booked` carries a newly scheduled interview time; unchanged dates are not
/// announced again.
fn status_message(
    detail: &ApplicationDetail,
    updated: &Application,
    booked: Option<DateTime<Utc>>,
) -> String {
    let label = updated.status.badge().label;
    match booked {
        Some(at) => format!(
            "Your application for {} at {} is now: {}. Interview on {}",
            detail.job_title,
            detail.company,
            label,
            at.with_timezone(&eat()).format("%d %b %Y, %H:%M")
        ),
        _ => format!(
            "Your application for {} at {} is now: {}",
            detail.job_title, detail.company, label
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::sample_detail;
    use crate::models::calendar_event::CalendarEvent;
    use crate::models::job::sample_job;
    use crate::models::notification::Notification;
    use crate::realtime::ChangeFeed;
    use crate::store::{ready, MockApplicationStore, MockCalendarStore, MockJobStore, MockNotificationStore};
    use chrono::{Duration, TimeZone, Utc};

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            role,
            email: None,
            name: Some("Achieng Otieno".into()),
            token: "t".into(),
            expires_at: 0,
        }
    }

    fn notifications(times: usize) -> NotificationService {
        let mut store = MockNotificationStore::new();
        store.expect_insert().times(times).returning(|new| {
            ready(Ok(Notification {
                id: Uuid::new_v4(),
                user_id: new.user_id,
                title: new.title,
                message: new.message,
                kind: new.kind,
                is_read: false,
                created_at: Utc::now(),
            }))
        });
        NotificationService::new(Arc::new(store), ChangeFeed::default())
    }

    fn calendar(times: usize) -> CalendarService {
        let mut store = MockCalendarStore::new();
        store.expect_insert().times(times).returning(|e| {
            ready(Ok(CalendarEvent {
                id: Uuid::new_v4(),
                user_id: e.user_id,
                title: e.title,
                description: e.description,
                event_date: e.event_date,
                start_time: e.start_time,
                location: e.location,
                kind: e.kind,
                created_at: Utc::now(),
            }))
        });
        CalendarService::new(Arc::new(store))
    }

    #[test]
    fn applicants_filter_and_sort() {
        let employer = Uuid::new_v4();
        let mut list = vec![
            sample_detail(employer, "Zawadi", ApplicationStatus::Pending),
            sample_detail(employer, "baraka", ApplicationStatus::Shortlisted),
            sample_detail(employer, "Amani", ApplicationStatus::Pending),
        ];
        list[0].application.applied_at = Utc::now() - Duration::days(2);
        list[2].applicant_skills = vec!["Figma".into()];

        let pending = ApplicantFilter {
            status: Some(ApplicationStatus::Pending),
            ..Default::default()
        };
        let names: Vec<String> = filter_applicants(list.clone(), &pending, ApplicantSort::Name)
            .into_iter()
            .map(|d| d.applicant_name)
            .collect();
        assert_eq!(names, vec!["Amani", "Zawadi"]);

        let oldest = filter_applicants(list.clone(), &ApplicantFilter::default(), ApplicantSort::Oldest);
        assert_eq!(oldest[0].applicant_name, "Zawadi");

        let figma = ApplicantFilter {
            search: Some("FIGMA".into()),
            ..Default::default()
        };
        assert_eq!(filter_applicants(list, &figma, ApplicantSort::Newest).len(), 1);
    }

    #[tokio::test]
    async fn apply_creates_and_notifies_employer() {
        let seeker = user(Role::JobSeeker);
        let job = sample_job("Sales Rep", "Bidco", "Thika", &[]);
        let job_id = job.id;

        let mut jobs = MockJobStore::new();
        jobs.expect_get().returning(move |_| ready(Ok(Some(job.clone()))));
        let mut apps = MockApplicationStore::new();
        apps.expect_find().returning(|_, _| ready(Ok(None)));
        let seeker_id = seeker.id;
        apps.expect_insert()
            .withf(move |a| a.applicant_id == seeker_id && a.cover_letter.is_none())
            .times(1)
            .returning(|a| {
                let mut detail = sample_detail(Uuid::new_v4(), "x", ApplicationStatus::Pending);
                detail.application.job_id = a.job_id;
                detail.application.applicant_id = a.applicant_id;
                ready(Ok(detail.application))
            });

        let service =
            ApplicationService::new(Arc::new(apps), Arc::new(jobs), notifications(1), calendar(0));
        let created = service
            .apply(&seeker, job_id, Some("  ".into()), None)
            .await
            .unwrap();
        assert_eq!(created.status, ApplicationStatus::Pending);
    }

    #[tokio::test]
    async fn duplicate_or_closed_applications_are_rejected() {
        let seeker = user(Role::JobSeeker);
        let mut closed = sample_job("Clerk", "KRA", "Nairobi", &[]);
        closed.status = JobStatus::Closed;
        let open = sample_job("Teller", "Equity", "Nakuru", &[]);
        let (closed_id, open_id) = (closed.id, open.id);

        let mut jobs = MockJobStore::new();
        jobs.expect_get().returning(move |id| {
            let job = if id == closed_id { closed.clone() } else { open.clone() };
            ready(Ok(Some(job)))
        });
        let mut apps = MockApplicationStore::new();
        apps.expect_find().returning(|_, _| {
            ready(Ok(Some(
                sample_detail(Uuid::new_v4(), "x", ApplicationStatus::Pending).application,
            )))
        });
        apps.expect_insert().never();

        let service =
            ApplicationService::new(Arc::new(apps), Arc::new(jobs), notifications(0), calendar(0));
        assert!(matches!(
            service.apply(&seeker, closed_id, None, None).await,
            Err(Error::BadRequest(_))
        ));
        assert!(matches!(
            service.apply(&seeker, open_id, None, None).await,
            Err(Error::Conflict(_))
        ));

        let employer = user(Role::Employer);
        assert!(matches!(
            service.apply(&employer, open_id, None, None).await,
            Err(Error::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn interview_update_notifies_and_books_calendar() {
        let employer = user(Role::Employer);
        let detail = sample_detail(employer.id, "Kipchoge", ApplicationStatus::Shortlisted);
        let app_id = detail.application.id;
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 7, 0, 0).unwrap();

        let mut apps = MockApplicationStore::new();
        let current = detail.clone();
        apps.expect_get().returning(move |_| ready(Ok(Some(current.clone()))));
        let base = detail.application.clone();
        apps.expect_update_status().times(1).returning(move |_, change| {
            let mut updated = base.clone();
            updated.status = change.status;
            updated.interview_date = change.interview_date;
            updated.notes = change.notes;
            ready(Ok(updated))
        });

        let service = ApplicationService::new(
            Arc::new(apps),
            Arc::new(MockJobStore::new()),
            notifications(1),
            calendar(1),
        );
        let updated = service
            .update_status(
                &employer,
                app_id,
                StatusChange {
                    status: ApplicationStatus::Interview,
                    interview_date: Some(at),
                    notes: Some("Bring certificates".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Interview);

        let message = status_message(&detail, &updated, updated.interview_date);
        assert!(message.contains("Interview Scheduled"));
        assert!(message.contains("10:00"));
    }

    #[tokio::test]
    async fn repeat_interview_update_keeps_a_single_booking() {
        let employer = user(Role::Employer);
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 7, 0, 0).unwrap();
        let mut detail = sample_detail(employer.id, "Wanjiru", ApplicationStatus::Interview);
        detail.application.interview_date = Some(at);
        let app_id = detail.application.id;

        let mut apps = MockApplicationStore::new();
        let current = detail.clone();
        apps.expect_get().returning(move |_| ready(Ok(Some(current.clone()))));
        let base = detail.application.clone();
        apps.expect_update_status().times(1).returning(move |_, change| {
            // the store keeps the stored date when none is sent
            let mut updated = base.clone();
            updated.status = change.status;
            updated.interview_date = change.interview_date.or(base.interview_date);
            updated.notes = change.notes;
            ready(Ok(updated))
        });

        let mut notes = MockNotificationStore::new();
        notes
            .expect_insert()
            .withf(|n| !n.message.contains("Interview on"))
            .times(1)
            .returning(|new| {
                ready(Ok(Notification {
                    id: Uuid::new_v4(),
                    user_id: new.user_id,
                    title: new.title,
                    message: new.message,
                    kind: new.kind,
                    is_read: false,
                    created_at: Utc::now(),
                }))
            });

        let service = ApplicationService::new(
            Arc::new(apps),
            Arc::new(MockJobStore::new()),
            NotificationService::new(Arc::new(notes), ChangeFeed::default()),
            calendar(0),
        );
        let updated = service
            .update_status(
                &employer,
                app_id,
                StatusChange {
                    status: ApplicationStatus::Interview,
                    interview_date: None,
                    notes: Some("Panel of three".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.interview_date, Some(at));
    }

    #[tokio::test]
    async fn rescheduled_interview_books_the_new_time() {
        let employer = user(Role::Employer);
        let first = Utc.with_ymd_and_hms(2025, 3, 14, 7, 0, 0).unwrap();
        let second = first + Duration::days(2);
        let mut detail = sample_detail(employer.id, "Odhiambo", ApplicationStatus::Interview);
        detail.application.interview_date = Some(first);
        let app_id = detail.application.id;

        let mut apps = MockApplicationStore::new();
        let current = detail.clone();
        apps.expect_get().returning(move |_| ready(Ok(Some(current.clone()))));
        let base = detail.application.clone();
        apps.expect_update_status().returning(move |_, change| {
            let mut updated = base.clone();
            updated.status = change.status;
            updated.interview_date = change.interview_date.or(base.interview_date);
            ready(Ok(updated))
        });

        let service = ApplicationService::new(
            Arc::new(apps),
            Arc::new(MockJobStore::new()),
            notifications(1),
            calendar(1),
        );
        service
            .update_status(
                &employer,
                app_id,
                StatusChange {
                    status: ApplicationStatus::Interview,
                    interview_date: Some(second),
                    notes: None,
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn only_owning_employer_updates_status() {
        let owner = Uuid::new_v4();
        let detail = sample_detail(owner, "Njeri", ApplicationStatus::Pending);
        let app_id = detail.application.id;
        let mut apps = MockApplicationStore::new();
        apps.expect_get().returning(move |_| ready(Ok(Some(detail.clone()))));
        apps.expect_update_status().never();

        let service = ApplicationService::new(
            Arc::new(apps),
            Arc::new(MockJobStore::new()),
            notifications(0),
            calendar(0),
        );
        let result = service
            .update_status(
                &user(Role::Employer),
                app_id,
                StatusChange {
                    status: ApplicationStatus::Rejected,
                    interview_date: None,
                    notes: None,
                },
            )
            .await;
        assert!(matches!(result, Err(Error::Forbidden(_))));
    }
}
