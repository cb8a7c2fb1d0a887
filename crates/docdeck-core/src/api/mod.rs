//! Authentication backend module.
//!
//! `AuthBackend` is the collaborator that turns login or signup input into a
//! `CredentialRecord`. No remote service exists yet; `MockAuthBackend`
//! accepts a single demo account and any well-formed registration.

pub mod error;
pub mod mock;

use async_trait::async_trait;

use crate::auth::{CredentialRecord, LoginCredentials, SignupForm};

pub use error::AuthError;
pub use mock::MockAuthBackend;

#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<CredentialRecord, AuthError>;

    async fn sign_up(&self, form: &SignupForm) -> Result<CredentialRecord, AuthError>;
}
