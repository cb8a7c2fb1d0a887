//! Authentication module for the session token and its secure persistence.
//!
//! This module provides:
//! - `SessionStore`: the single session token, bootstrapped from and
//!   persisted to secure storage
//! - `SecureStorage`: async key-value trait with keychain and in-memory backends
//! - `CredentialRecord`: what the authentication backend hands back
//! - Form validation for the login and signup screens

pub mod credentials;
pub mod error;
pub mod session;
pub mod storage;
pub mod validation;

pub use credentials::{
    CredentialRecord, LoginCredentials, MissingTokenPolicy, SignupForm, UserProfile,
    PLACEHOLDER_TOKEN,
};
pub use error::{SessionError, StorageError};
pub use session::{Session, SessionStore};
pub use storage::{KeyringStorage, MemoryStorage, SecureStorage, DEFAULT_SERVICE, TOKEN_KEY};
pub use validation::{validate_login, validate_signup, FieldError, FormField, ValidationErrors};
