use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ApiError;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref USERNAME_RE: Regex = Regex::new(r"^[a-zA-Z0-9_]{3,30}$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// 3-30 chars, letters, digits and underscores only.
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// At least 8 chars with upper, lower, digit and a special character.
pub fn check_password_strength(password: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ApiError::Validation(
            "Password must contain at least one uppercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ApiError::Validation(
            "Password must contain at least one lowercase letter".into(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ApiError::Validation(
            "Password must contain at least one number".into(),
        ));
    }
    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ApiError::Validation(
            "Password must contain at least one special character".into(),
        ));
    }
    Ok(())
}

pub fn is_valid_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plausible_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.domain.io"));
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email("user@domain"));
    }

    #[test]
    fn username_rules() {
        assert!(is_valid_username("jane_doe1"));
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("dash-not-ok"));
        assert!(!is_valid_username(&"x".repeat(31)));
    }

    #[test]
    fn password_strength_rules() {
        assert!(check_password_strength("Secur3P@ss").is_ok());
        assert!(check_password_strength("short1A!").is_ok());
        assert!(check_password_strength("sh0rt!A").is_err()); // 7 chars
        assert!(check_password_strength("alllower1!").is_err());
        assert!(check_password_strength("ALLUPPER1!").is_err());
        assert!(check_password_strength("NoDigits!!").is_err());
        assert!(check_password_strength("NoSpecial11").is_err());
    }

    #[test]
    fn url_shape() {
        assert!(is_valid_url("https://cdn.example.com/a.png"));
        assert!(is_valid_url("http://localhost:3000/x"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("example.com/a.png"));
    }
}
