use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::users::model::{Role, User};
use crate::validate::{is_valid_email, is_valid_url, is_valid_username};

/// Public part of the user returned to clients (listings, auth responses).
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub email_verified: bool,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login_at: Option<OffsetDateTime>,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            username: u.username.clone(),
            role: u.role,
            email_verified: u.email_verified,
            full_name: u.full_name.clone(),
            avatar_url: u.avatar_url.clone(),
            created_at: u.created_at,
            last_login_at: u.last_login_at,
        }
    }
}

/// Single-user view (get-by-id, admin update): summary plus bio and
/// update timestamp, without quota/settings.
#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub email_verified: bool,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login_at: Option<OffsetDateTime>,
}

impl From<&User> for UserDetail {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            username: u.username.clone(),
            role: u.role,
            email_verified: u.email_verified,
            full_name: u.full_name.clone(),
            avatar_url: u.avatar_url.clone(),
            bio: u.bio.clone(),
            created_at: u.created_at,
            updated_at: u.updated_at,
            last_login_at: u.last_login_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Quota {
    pub text_tokens: i64,
    pub images: i64,
    pub videos: i64,
    pub audio_minutes: i64,
}

/// The caller's own record with quota and settings expanded.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub role: Role,
    pub email_verified: bool,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub quota: Quota,
    pub settings: serde_json::Value,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_login_at: Option<OffsetDateTime>,
}

impl From<&User> for ProfileResponse {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            username: u.username.clone(),
            role: u.role,
            email_verified: u.email_verified,
            full_name: u.full_name.clone(),
            avatar_url: u.avatar_url.clone(),
            bio: u.bio.clone(),
            quota: Quota {
                text_tokens: u.quota_text_tokens,
                images: u.quota_images,
                videos: u.quota_videos,
                audio_minutes: u.quota_audio_minutes,
            },
            settings: u.settings.clone(),
            created_at: u.created_at,
            updated_at: u.updated_at,
            last_login_at: u.last_login_at,
        }
    }
}

/// Partial profile update; only supplied fields are written.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub settings: Option<serde_json::Value>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.avatar_url.is_none()
            && self.bio.is_none()
            && self.settings.is_none()
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.is_empty() {
            return Err(ApiError::Validation("No fields to update".into()));
        }
        if let Some(full_name) = &self.full_name {
            if full_name.trim().is_empty() {
                return Err(ApiError::Validation("Full name cannot be empty".into()));
            }
        }
        if let Some(avatar_url) = &self.avatar_url {
            if !is_valid_url(avatar_url) {
                return Err(ApiError::Validation("Invalid avatar URL".into()));
            }
        }
        if let Some(bio) = &self.bio {
            if bio.len() > 500 {
                return Err(ApiError::Validation("Bio cannot exceed 500 characters".into()));
            }
        }
        if let Some(settings) = &self.settings {
            if !settings.is_object() {
                return Err(ApiError::Validation("Settings must be an object".into()));
            }
        }
        Ok(())
    }
}

/// Admin-side partial update over identity, role, verification and quotas.
#[derive(Debug, Default, Deserialize)]
pub struct AdminUpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub role: Option<Role>,
    pub email_verified: Option<bool>,
    pub quota_text_tokens: Option<i64>,
    pub quota_images: Option<i64>,
    pub quota_videos: Option<i64>,
    pub quota_audio_minutes: Option<i64>,
}

impl AdminUpdateUserRequest {
    pub fn normalize(&mut self) {
        if let Some(email) = &mut self.email {
            *email = email.trim().to_lowercase();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.role.is_none()
            && self.email_verified.is_none()
            && self.quota_text_tokens.is_none()
            && self.quota_images.is_none()
            && self.quota_videos.is_none()
            && self.quota_audio_minutes.is_none()
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.is_empty() {
            return Err(ApiError::Validation("No fields to update".into()));
        }
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                return Err(ApiError::Validation("Invalid email address".into()));
            }
        }
        if let Some(username) = &self.username {
            if !is_valid_username(username) {
                return Err(ApiError::Validation(
                    "Username must be 3-30 characters of letters, numbers and underscores".into(),
                ));
            }
        }
        for quota in [
            self.quota_text_tokens,
            self.quota_images,
            self.quota_videos,
            self.quota_audio_minutes,
        ]
        .into_iter()
        .flatten()
        {
            if quota < 0 {
                return Err(ApiError::Validation("Quotas cannot be negative".into()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_profile_rejects_empty_body() {
        let req = UpdateProfileRequest::default();
        assert!(req.is_empty());
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_profile_rejects_long_bio() {
        let req = UpdateProfileRequest {
            bio: Some("x".repeat(501)),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_profile_rejects_non_object_settings() {
        let req = UpdateProfileRequest {
            settings: Some(serde_json::json!([1, 2, 3])),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn update_profile_accepts_single_field() {
        let req = UpdateProfileRequest {
            bio: Some("hello".into()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn admin_update_rejects_negative_quota() {
        let req = AdminUpdateUserRequest {
            quota_images: Some(-1),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
