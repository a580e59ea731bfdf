use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::users::dto::UserSummary;
use crate::validate::{check_password_strength, is_valid_email, is_valid_username};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
}

impl RegisterRequest {
    pub fn normalize(&mut self) {
        self.email = self.email.trim().to_lowercase();
        self.username = self.username.trim().to_string();
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if !is_valid_email(&self.email) {
            return Err(ApiError::Validation("Invalid email address".into()));
        }
        if !is_valid_username(&self.username) {
            return Err(ApiError::Validation(
                "Username must be 3-30 characters of letters, numbers and underscores".into(),
            ));
        }
        check_password_strength(&self.password)?;
        if let Some(full_name) = &self.full_name {
            if full_name.trim().is_empty() {
                return Err(ApiError::Validation("Full name cannot be empty".into()));
            }
        }
        Ok(())
    }
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn normalize(&mut self) {
        self.email = self.email.trim().to_lowercase();
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if !is_valid_email(&self.email) {
            return Err(ApiError::Validation("Invalid email address".into()));
        }
        if self.password.is_empty() {
            return Err(ApiError::Validation("Password is required".into()));
        }
        Ok(())
    }
}

/// Response returned after login or register.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserSummary,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "User@Example.COM ".into(),
            username: "jane_doe".into(),
            password: "Secur3P@ss".into(),
            full_name: Some("Jane Doe".into()),
        }
    }

    #[test]
    fn normalize_lowercases_and_trims_email() {
        let mut req = register_request();
        req.normalize();
        assert_eq!(req.email, "user@example.com");
    }

    #[test]
    fn validates_happy_path() {
        let mut req = register_request();
        req.normalize();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_bad_username() {
        let mut req = register_request();
        req.username = "no spaces allowed".into();
        req.normalize();
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_weak_password() {
        let mut req = register_request();
        req.password = "password".into();
        req.normalize();
        assert!(req.validate().is_err());
    }

    #[test]
    fn login_requires_password() {
        let mut req = LoginRequest {
            email: "user@example.com".into(),
            password: String::new(),
        };
        req.normalize();
        assert!(req.validate().is_err());
    }
}
