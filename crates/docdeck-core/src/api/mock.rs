use async_trait::async_trait;
use tracing::{debug, info};

use crate::auth::{
    validate_login, validate_signup, CredentialRecord, LoginCredentials, SignupForm, UserProfile,
};

use super::{AuthBackend, AuthError};

// ============================================================================
// Constants
// ============================================================================

pub const DEMO_EMAIL: &str = "razin@example.com";
pub const DEMO_PASSWORD: &str = "password123";
pub const DEMO_NAME: &str = "Razin Mohamed";

/// Token issued for the demo account
pub const DEMO_TOKEN: &str = "mock-jwt-token";

const DEMO_USER_ID: i64 = 1;

/// Id handed to freshly registered users
const NEW_USER_ID: i64 = 2;

/// In-process stand-in for the authentication service.
///
/// Sign-in accepts only the configured demo account (email lowercased and
/// compared without trimming). Sign-up accepts any form that passes
/// validation and returns a record without a token, so the session store's
/// `MissingTokenPolicy` decides the outcome.
#[derive(Debug, Clone)]
pub struct MockAuthBackend {
    demo_email: String,
    demo_password: String,
}

impl MockAuthBackend {
    pub fn new() -> Self {
        Self::with_demo_account(DEMO_EMAIL, DEMO_PASSWORD)
    }

    pub fn with_demo_account(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            demo_email: email.into(),
            demo_password: password.into(),
        }
    }

    fn demo_record(&self) -> CredentialRecord {
        CredentialRecord {
            token: Some(DEMO_TOKEN.to_string()),
            user: UserProfile {
                id: DEMO_USER_ID,
                email: self.demo_email.clone(),
                name: DEMO_NAME.to_string(),
            },
        }
    }
}

impl Default for MockAuthBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<CredentialRecord, AuthError> {
        validate_login(credentials)?;

        // Compared as typed: surrounding whitespace is not ignored
        let email = credentials.email.as_str();
        if email.to_lowercase() == self.demo_email.to_lowercase()
            && credentials.password == self.demo_password
        {
            info!(email, "Mock sign-in accepted");
            Ok(self.demo_record())
        } else {
            debug!(email, "Mock sign-in rejected");
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn sign_up(&self, form: &SignupForm) -> Result<CredentialRecord, AuthError> {
        validate_signup(form)?;

        info!(email = form.email.trim(), "Mock sign-up accepted");
        Ok(CredentialRecord {
            token: None,
            user: UserProfile {
                id: NEW_USER_ID,
                email: form.email.trim().to_string(),
                name: form.full_name.trim().to_string(),
            },
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
