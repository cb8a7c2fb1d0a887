//! docdeck core - session state for the document dashboard client.
//!
//! This crate holds the authentication session (token bootstrap, sign-in,
//! sign-up, sign-out) backed by secure storage, and the navigation guard
//! that decides which screens are reachable for a given session.

pub mod api;
pub mod auth;
pub mod config;
pub mod navigation;

pub use api::{AuthBackend, AuthError, MockAuthBackend};
pub use auth::{
    CredentialRecord, KeyringStorage, LoginCredentials, MemoryStorage, MissingTokenPolicy,
    SecureStorage, Session, SessionError, SessionStore, SignupForm, StorageError, UserProfile,
};
pub use config::Config;
pub use navigation::{decide, MainTab, NavigationDecision, Route, ScreenGroup, Transition};
