use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

/// Token substituted for a tokenless credential when running in demo mode
pub const PLACEHOLDER_TOKEN: &str = "mock-auth-token";

/// What the session store does with a credential that carries no token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingTokenPolicy {
    /// Fail the operation and leave the session untouched
    #[default]
    Reject,
    /// Substitute `PLACEHOLDER_TOKEN`
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
}

/// Result of a successful sign-in or sign-up with the authentication backend.
/// Only `token` is interpreted by the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct CredentialRecord {
    #[serde(default)]
    pub token: Option<String>,
    pub user: UserProfile,
}

impl CredentialRecord {
    /// The token, if present and non-empty
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// Resolve the token to persist under the given policy
    pub fn resolve_token(&self, policy: MissingTokenPolicy) -> Option<String> {
        match (self.token(), policy) {
            (Some(token), _) => Some(token.to_string()),
            (None, MissingTokenPolicy::Placeholder) => Some(PLACEHOLDER_TOKEN.to_string()),
            (None, MissingTokenPolicy::Reject) => None,
        }
    }
}

/// Email and password as typed on the login screen
#[derive(Debug, Clone, Default)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Fields of the registration form
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}
