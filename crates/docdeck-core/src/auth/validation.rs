//! Login and registration form checks, run before the backend is called.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::{LoginCredentials, SignupForm};

/// Minimum password length for new accounts
const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FullName,
    Email,
    Password,
    ConfirmPassword,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::FullName => "Full name",
            FormField::Email => "Email",
            FormField::Password => "Password",
            FormField::ConfirmPassword => "Confirm password",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: &'static str,
}

/// Every failing field of a submitted form, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: FormField, message: &'static str) {
        self.errors.push(FieldError { field, message });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for a field, if it failed
    pub fn message_for(&self, field: FormField) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }

    /// One `Label: message` line per failing field
    pub fn labeled_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.field.label(), e.message))
            .collect()
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Check the login form. Stops at the first missing field.
pub fn validate_login(credentials: &LoginCredentials) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if credentials.email.trim().is_empty() {
        errors.push(FormField::Email, "Please enter your email address");
    } else if credentials.password.is_empty() {
        errors.push(FormField::Password, "Please enter your password");
    }
    errors.into_result()
}

/// Check the registration form, collecting an error for every failing field
pub fn validate_signup(form: &SignupForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if form.full_name.trim().is_empty() {
        errors.push(FormField::FullName, "Full name is required");
    }

    if form.email.trim().is_empty() {
        errors.push(FormField::Email, "Email is required");
    } else if !is_valid_email(&form.email) {
        errors.push(FormField::Email, "Please enter a valid email address");
    }

    if form.password.is_empty() {
        errors.push(FormField::Password, "Password is required");
    } else if !is_strong_password(&form.password) {
        errors.push(
            FormField::Password,
            "Password must be at least 6 characters with 1 number",
        );
    }

    if form.password != form.confirm_password {
        errors.push(FormField::ConfirmPassword, "Passwords do not match");
    }

    errors.into_result()
}

/// `local@domain.tld` with no whitespace and exactly one `@`
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// At least six UTF-16 code units, one of them an ASCII digit.
///
/// Length is counted the way the mobile client's text fields count it, so a
/// character outside the Basic Multilingual Plane counts twice.
pub fn is_strong_password(password: &str) -> bool {
    password.encode_utf16().count() >= MIN_PASSWORD_LENGTH
        && password.chars().any(|c| c.is_ascii_digit())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(name: &str, email: &str, password: &str, confirm: &str) -> SignupForm {
        SignupForm {
            full_name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("razin@example.com"));
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@sub.domain.org"));

        assert!(!is_valid_email("razin"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("razin@example"));
        assert!(!is_valid_email("razin@.com"));
        assert!(!is_valid_email("razin@example."));
        assert!(!is_valid_email("ra zin@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("razin@example.com "));
    }

    #[test]
    fn test_is_valid_email_dot_placement() {
        assert!(is_valid_email("a@b.c.d"));
        assert!(is_valid_email("a@b..c"));
        assert!(is_valid_email("a@b.c."));
        assert!(is_valid_email("a@.b.c"));
        assert!(!is_valid_email("a@b."));
    }

    #[test]
    fn test_is_strong_password() {
        assert!(is_strong_password("abc123"));
        assert!(is_strong_password("password1"));
        assert!(!is_strong_password("abc12"));
        assert!(!is_strong_password("password"));
        // Astral characters count as two units: a, b, two for the emoji, 1, 2
        assert!(is_strong_password("ab\u{1F600}12"));
        assert!(!is_strong_password("\u{e9}\u{e9}\u{e9}\u{e9}1"));
    }

    #[test]
    fn test_validate_login_missing_email() {
        let err = validate_login(&LoginCredentials::new("   ", "secret")).unwrap_err();
        assert_eq!(
            err.message_for(FormField::Email),
            Some("Please enter your email address")
        );
        assert_eq!(err.errors.len(), 1);
    }

    #[test]
    fn test_validate_login_missing_password() {
        let err = validate_login(&LoginCredentials::new("razin@example.com", "")).unwrap_err();
        assert_eq!(
            err.message_for(FormField::Password),
            Some("Please enter your password")
        );
    }

    #[test]
    fn test_validate_login_ok() {
        assert!(validate_login(&LoginCredentials::new("razin@example.com", "password123")).is_ok());
    }

    #[test]
    fn test_validate_signup_ok() {
        let form = signup("Razin Mohamed", "razin@example.com", "secret1", "secret1");
        assert!(validate_signup(&form).is_ok());
    }

    #[test]
    fn test_validate_signup_collects_all_errors() {
        let form = signup("", "not-an-email", "short", "different");
        let err = validate_signup(&form).unwrap_err();

        assert_eq!(err.errors.len(), 4);
        assert_eq!(err.message_for(FormField::FullName), Some("Full name is required"));
        assert_eq!(
            err.message_for(FormField::Email),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            err.message_for(FormField::Password),
            Some("Password must be at least 6 characters with 1 number")
        );
        assert_eq!(
            err.message_for(FormField::ConfirmPassword),
            Some("Passwords do not match")
        );
    }

    #[test]
    fn test_validate_signup_required_fields() {
        let err = validate_signup(&signup("Name", "", "", "")).unwrap_err();
        assert_eq!(err.message_for(FormField::Email), Some("Email is required"));
        assert_eq!(err.message_for(FormField::Password), Some("Password is required"));
        // Empty password and empty confirmation match
        assert_eq!(err.message_for(FormField::ConfirmPassword), None);
    }

    #[test]
    fn test_labeled_messages() {
        let err = validate_signup(&signup("", "a@b.co", "abc123", "abc124")).unwrap_err();
        assert_eq!(
            err.labeled_messages(),
            vec![
                "Full name: Full name is required".to_string(),
                "Confirm password: Passwords do not match".to_string(),
            ]
        );
    }

    #[test]
    fn test_validation_errors_display() {
        let err = validate_signup(&signup("", "a@b.co", "abc123", "abc123")).unwrap_err();
        assert_eq!(err.to_string(), "Full name is required");
    }
}
