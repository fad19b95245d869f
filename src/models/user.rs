use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

text_enum!(
    /// Partitions the product into the employer and job-seeker experiences.
    Role {
        Employer => "employer",
        JobSeeker => "job_seeker",
    }
);

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub rating: Option<f64>,
    pub avatar_url: Option<String>,
    pub resume_url: Option<String>,
    pub company_name: Option<String>,
    pub company_website: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Share of the role-relevant fields that are filled in, 0..=100.
    pub fn completion(&self) -> u8 {
        fn filled(value: &Option<String>) -> bool {
            value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
        }

        let mut checks = vec![
            !self.full_name.trim().is_empty(),
            !self.email.trim().is_empty(),
            filled(&self.phone),
            filled(&self.location),
            filled(&self.bio),
            filled(&self.avatar_url),
        ];
        match self.role {
            Role::JobSeeker => {
                checks.push(!self.skills.is_empty());
                checks.push(filled(&self.resume_url));
            }
            Role::Employer => {
                checks.push(filled(&self.company_name));
                checks.push(filled(&self.company_website));
                checks.push(filled(&self.industry));
                checks.push(filled(&self.company_size));
            }
        }

        let done = checks.iter().filter(|c| **c).count();
        ((done * 100) / checks.len()) as u8
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub id: Uuid,
    pub role: Role,
    pub full_name: String,
    pub email: String,
}

/// Partial profile change; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub avatar_url: Option<String>,
    pub resume_url: Option<String>,
    pub company_name: Option<String>,
    pub company_website: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
}

#[cfg(test)]
pub(crate) fn sample_profile(role: Role) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        role,
        full_name: "Wanjiku Kamau".into(),
        email: "wanjiku@example.co.ke".into(),
        phone: None,
        location: Some("Nairobi".into()),
        bio: None,
        skills: vec![],
        rating: None,
        avatar_url: None,
        resume_url: None,
        company_name: None,
        company_website: None,
        industry: None,
        company_size: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_text() {
        assert_eq!("job_seeker".parse::<Role>().unwrap(), Role::JobSeeker);
        assert_eq!(Role::Employer.as_str(), "employer");
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn completion_counts_role_fields() {
        let mut seeker = sample_profile(Role::JobSeeker);
        // name, email, location out of eight
        assert_eq!(seeker.completion(), 37);

        seeker.skills = vec!["Rust".into()];
        seeker.resume_url = Some("https://cdn/resume.pdf".into());
        seeker.phone = Some("0712345678".into());
        seeker.bio = Some("Backend developer".into());
        seeker.avatar_url = Some("https://cdn/me.png".into());
        assert_eq!(seeker.completion(), 100);

        let employer = sample_profile(Role::Employer);
        assert_eq!(employer.completion(), 30);
    }
}
