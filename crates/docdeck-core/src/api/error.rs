use thiserror::Error;

use crate::auth::ValidationErrors;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials. Please try again.")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(#[from] ValidationErrors),
}

impl AuthError {
    /// Message suitable for showing next to the form
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Validation(errors) => errors
                .errors
                .first()
                .map(|e| e.message.to_string())
                .unwrap_or_else(|| self.to_string()),
            _ => self.to_string(),
        }
    }
}
