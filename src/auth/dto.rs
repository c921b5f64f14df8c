use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::auth::repo_types::User;
use crate::error::AppError;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Request body for login. `username` may also hold an email address.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: i64,
    pub username: String,
}

// Column widths in the users table.
const MAX_EMAIL_LEN: usize = 100;
const MAX_NAME_LEN: usize = 50;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let len = self.username.chars().count();
        if !(3..=50).contains(&len) {
            return Err(AppError::Validation(
                "username must be between 3 and 50 characters".into(),
            ));
        }
        if self.email.chars().count() > MAX_EMAIL_LEN || !is_valid_email(&self.email) {
            return Err(AppError::Validation("invalid email".into()));
        }
        for (field, value) in [("first name", &self.first_name), ("last name", &self.last_name)] {
            if value.as_deref().is_some_and(|v| v.chars().count() > MAX_NAME_LEN) {
                return Err(AppError::Validation(format!(
                    "{field} must be at most {MAX_NAME_LEN} characters"
                )));
            }
        }
        if self.password.chars().count() < 6 {
            return Err(AppError::Validation(
                "password must be at least 6 characters".into(),
            ));
        }
        Ok(())
    }
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(AppError::Validation(
                "username and password are required".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("test@example.com"));
        assert!(!is_valid_email("test@example"));
        assert!(!is_valid_email("no at sign.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn register_validation_bounds() {
        assert!(register("testuser", "test@example.com", "password123").validate().is_ok());
        assert!(register("ab", "test@example.com", "password123").validate().is_err());
        assert!(register(&"x".repeat(51), "test@example.com", "password123").validate().is_err());
        assert!(register("abc", "bad-email", "password123").validate().is_err());
        assert!(register("abc", "a@b.io", "12345").validate().is_err());
        assert!(register("abc", "a@b.io", "123456").validate().is_ok());
    }

    #[test]
    fn register_rejects_values_wider_than_columns() {
        let email_at = |len: usize| format!("{}@example.com", "a".repeat(len - "@example.com".len()));
        assert!(register("abc", &email_at(100), "password123").validate().is_ok());
        assert!(register("abc", &email_at(101), "password123").validate().is_err());

        let mut req = register("abc", "a@b.io", "password123");
        req.first_name = Some("F".repeat(50));
        req.last_name = Some("L".repeat(50));
        assert!(req.validate().is_ok());

        req.first_name = Some("F".repeat(51));
        assert!(req.validate().is_err());

        req.first_name = None;
        req.last_name = Some("L".repeat(51));
        assert!(matches!(
            req.validate(),
            Err(AppError::Validation(msg)) if msg == "last name must be at most 50 characters"
        ));
    }

    #[test]
    fn login_requires_both_fields() {
        let ok = LoginRequest { username: "u".into(), password: "p".into() };
        let missing = LoginRequest { username: "".into(), password: "p".into() };
        assert!(ok.validate().is_ok());
        assert!(missing.validate().is_err());
    }

    #[test]
    fn register_request_reads_camel_case_names() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"testuser","email":"t@e.com","password":"secret1","firstName":"Test"}"#,
        )
        .unwrap();
        assert_eq!(req.first_name.as_deref(), Some("Test"));
        assert_eq!(req.last_name, None);
    }
}
