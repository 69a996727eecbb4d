//! Request payload validation

use regex::Regex;
use std::sync::OnceLock;

use crate::auth::models::{LoginRequest, RegisterRequest, UpdateUserRequest};
use crate::auth::password::MAX_PASSWORD_BYTES;
use crate::error::{Error, Result};

const MIN_NAME_CHARS: usize = 2;
const MIN_PASSWORD_CHARS: usize = 6;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .expect("Invalid regex pattern - this is a bug in the codebase")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

fn check_name(name: &str, problems: &mut Vec<String>) {
    if name.trim().chars().count() < MIN_NAME_CHARS {
        problems.push(format!("name must be at least {} characters", MIN_NAME_CHARS));
    }
}

fn check_email(email: &str, problems: &mut Vec<String>) {
    if !is_valid_email(email.trim()) {
        problems.push("email must be a valid email address".to_string());
    }
}

fn finish(problems: Vec<String>) -> Result<()> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(problems.join("; ")))
    }
}

pub fn validate_register(req: &RegisterRequest) -> Result<()> {
    let mut problems = Vec::new();
    check_name(&req.name, &mut problems);
    check_email(&req.email, &mut problems);
    if req.password.chars().count() < MIN_PASSWORD_CHARS {
        problems.push(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_CHARS
        ));
    }
    if req.password.len() > MAX_PASSWORD_BYTES {
        problems.push(format!(
            "password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        ));
    }
    finish(problems)
}

pub fn validate_login(req: &LoginRequest) -> Result<()> {
    let mut problems = Vec::new();
    check_email(&req.email, &mut problems);
    if req.password.is_empty() {
        problems.push("password is required".to_string());
    }
    finish(problems)
}

/// Empty fields mean "leave unchanged" and are not checked
pub fn validate_update(req: &UpdateUserRequest) -> Result<()> {
    let mut problems = Vec::new();
    if let Some(name) = req.name.as_deref().filter(|n| !n.is_empty()) {
        check_name(name, &mut problems);
    }
    if let Some(email) = req.email.as_deref().filter(|e| !e.is_empty()) {
        check_email(email, &mut problems);
    }
    finish(problems)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(validate_register(&register("Ann", "ann@x.com", "secret1")).is_ok());
    }

    #[test]
    fn test_registration_limits() {
        assert!(validate_register(&register("A", "ann@x.com", "secret1")).is_err());
        assert!(validate_register(&register("Ann", "ann@x", "secret1")).is_err());
        assert!(validate_register(&register("Ann", "ann@x.com", "12345")).is_err());
        assert!(validate_register(&register("Al", "al@x.io", "123456")).is_ok());
    }

    #[test]
    fn test_password_byte_limit() {
        let at_limit = "a".repeat(MAX_PASSWORD_BYTES);
        assert!(validate_register(&register("Ann", "ann@x.com", &at_limit)).is_ok());

        let over = format!("{}b", at_limit);
        let err = validate_register(&register("Ann", "ann@x.com", &over)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // 25 three-byte characters: few chars, too many bytes
        let multibyte = "€".repeat(25);
        assert!(validate_register(&register("Ann", "ann@x.com", &multibyte)).is_err());
    }

    #[test]
    fn test_all_problems_are_reported() {
        let err = validate_register(&register("", "nope", "")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("name"));
        assert!(message.contains("email"));
        assert!(message.contains("password"));
    }

    #[test]
    fn test_email_syntax() {
        assert!(is_valid_email("ann@x.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("ann.x.com"));
        assert!(!is_valid_email("ann@@x.com"));
        assert!(!is_valid_email("ann @x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_login_requires_password() {
        let req = LoginRequest {
            email: "ann@x.com".to_string(),
            password: String::new(),
        };
        assert!(validate_login(&req).is_err());
    }

    #[test]
    fn test_update_ignores_empty_fields() {
        let req = UpdateUserRequest {
            name: Some(String::new()),
            email: None,
        };
        assert!(validate_update(&req).is_ok());

        let req = UpdateUserRequest {
            name: Some("B".to_string()),
            email: Some("bad".to_string()),
        };
        assert!(validate_update(&req).is_err());
    }
}
