use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::{Profile, ProfileUpdate};
use crate::utils::validation::{normalize_kenyan_phone, validate_kenyan_phone};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfilePayload {
    #[validate(length(min = 2, max = 120))]
    pub full_name: Option<String>,
    #[validate(custom(function = "validate_kenyan_phone"))]
    pub phone: Option<String>,
    #[validate(length(max = 120))]
    pub location: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    #[validate(length(max = 160))]
    pub company_name: Option<String>,
    #[validate(length(max = 255))]
    pub company_website: Option<String>,
    #[validate(length(max = 120))]
    pub industry: Option<String>,
    #[validate(length(max = 40))]
    pub company_size: Option<String>,
}

impl From<UpdateProfilePayload> for ProfileUpdate {
    fn from(p: UpdateProfilePayload) -> Self {
        Self {
            full_name: p.full_name.map(|n| n.trim().to_string()),
            // validated above, so normalisation succeeds
            phone: p.phone.and_then(|raw| normalize_kenyan_phone(&raw)),
            location: p.location,
            bio: p.bio,
            skills: p.skills.map(|skills| {
                skills
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }),
            avatar_url: None,
            resume_url: None,
            company_name: p.company_name,
            company_website: p.company_website,
            industry: p.industry,
            company_size: p.company_size,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub completion: u8,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let completion = profile.completion();
        Self {
            profile,
            completion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_must_be_kenyan_and_is_normalised() {
        let bad = UpdateProfilePayload {
            phone: Some("555-0100".into()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let good = UpdateProfilePayload {
            phone: Some("0722 000 111".into()),
            ..Default::default()
        };
        assert!(good.validate().is_ok());
        assert_eq!(
            ProfileUpdate::from(good).phone.as_deref(),
            Some("254722000111")
        );
    }
}
