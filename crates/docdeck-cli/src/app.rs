//! Application state for the docdeck CLI.
//!
//! `App` owns the configuration, the session store and the authentication
//! backend, and runs the login / signup / logout flows the screens would.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error, info, warn};

use docdeck_core::auth::{validate_login, validate_signup, ValidationErrors};
use docdeck_core::{
    decide, AuthBackend, Config, KeyringStorage, LoginCredentials, MemoryStorage,
    MockAuthBackend, NavigationDecision, SecureStorage, Session, SessionStore, SignupForm,
};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Where the session token is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Keychain,
    Memory,
}

pub struct App {
    pub config: Config,
    /// Where `config` is saved; `None` keeps it in memory only
    config_path: Option<PathBuf>,
    pub store: Arc<SessionStore>,
    backend: Box<dyn AuthBackend>,
    pub login_error: Option<String>,
    /// Field errors from the last rejected form
    pub validation_errors: Option<ValidationErrors>,
}

impl App {
    pub fn new(storage_kind: StorageKind) -> Self {
        let config_path = match Config::default_path() {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "No config directory, settings will not be saved");
                None
            }
        };

        let config = match config_path.as_deref().map(Config::load_from) {
            Some(Ok(c)) => c,
            Some(Err(e)) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
            None => Config::default(),
        };
        debug!(?config_path, "Config loaded");

        Self::with_config(config, config_path, storage_kind)
    }

    pub fn with_config(
        config: Config,
        config_path: Option<PathBuf>,
        storage_kind: StorageKind,
    ) -> Self {
        let storage: Arc<dyn SecureStorage> = match storage_kind {
            StorageKind::Keychain => {
                Arc::new(KeyringStorage::with_service(config.keyring_service.clone()))
            }
            StorageKind::Memory => Arc::new(MemoryStorage::new()),
        };
        debug!(?storage_kind, service = %config.keyring_service, "Storage configured");

        let store = SessionStore::new(storage)
            .with_token_key(config.token_key.clone())
            .with_missing_token_policy(config.missing_token_policy());

        let backend = MockAuthBackend::with_demo_account(
            config.demo_email.clone(),
            config.demo_password.clone(),
        );

        Self {
            config,
            config_path,
            store: Arc::new(store),
            backend: Box::new(backend),
            login_error: None,
            validation_errors: None,
        }
    }

    pub async fn bootstrap(&self) -> Session {
        self.store.bootstrap().await
    }

    pub fn decision(&self) -> NavigationDecision {
        decide(&self.store.snapshot())
    }

    pub async fn attempt_login(&mut self, credentials: LoginCredentials) -> Result<()> {
        if let Err(errors) = validate_login(&credentials) {
            let message = errors.to_string();
            self.login_error = Some(message.clone());
            self.validation_errors = Some(errors);
            return Err(anyhow::anyhow!(message));
        }

        self.login_error = None;
        self.validation_errors = None;

        let record = match self.backend.sign_in(&credentials).await {
            Ok(record) => record,
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_error = Some(e.user_message());
                return Err(e.into());
            }
        };

        if let Err(e) = self.store.sign_in(&record).await {
            self.login_error = Some("Failed to sign in. Please try again.".to_string());
            return Err(e.into());
        }

        self.remember_email(credentials.email.trim());
        info!("Login successful");
        Ok(())
    }

    pub async fn attempt_signup(&mut self, form: SignupForm) -> Result<()> {
        if let Err(errors) = validate_signup(&form) {
            let message = errors.to_string();
            self.login_error = Some(message.clone());
            self.validation_errors = Some(errors);
            return Err(anyhow::anyhow!(message));
        }

        self.login_error = None;
        self.validation_errors = None;

        let record = match self.backend.sign_up(&form).await {
            Ok(record) => record,
            Err(e) => {
                error!(error = %e, "Signup failed");
                self.login_error = Some(e.user_message());
                return Err(e.into());
            }
        };

        if let Err(e) = self.store.sign_up(&record).await {
            self.login_error = Some("Failed to register. Please try again.".to_string());
            return Err(e.into());
        }

        self.remember_email(form.email.trim());
        info!("Signup successful");
        Ok(())
    }

    /// Error to surface for a failed login or signup: one labeled line per
    /// field for validation failures, otherwise the form-level message
    pub fn failure_report(&self, err: anyhow::Error) -> anyhow::Error {
        if let Some(ref errors) = self.validation_errors {
            return anyhow::anyhow!(errors.labeled_messages().join("\n"));
        }
        match self.login_error {
            Some(ref message) => anyhow::anyhow!(message.clone()),
            None => err,
        }
    }

    pub async fn logout(&mut self) -> Result<()> {
        self.store.sign_out().await?;
        Ok(())
    }

    fn remember_email(&mut self, email: &str) {
        self.config.last_email = Some(email.to_string());
        if let Some(ref path) = self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!(error = %e, "Failed to save config");
            }
        }
    }

    // =========================================================================
    // Prompts
    // =========================================================================

    /// Prompt for an email, offering the last used one as the default
    pub fn prompt_email(&self) -> Result<String> {
        let input = match self.config.last_email {
            Some(ref last) => {
                let input = prompt_line(&format!("Email [{}]: ", last))?;
                if input.is_empty() {
                    last.clone()
                } else {
                    input
                }
            }
            None => prompt_line("Email: ")?,
        };
        Ok(clamp_input(input, MAX_EMAIL_LENGTH))
    }

    pub fn prompt_password(label: &str) -> Result<String> {
        let password = rpassword::prompt_password(label)?;
        Ok(clamp_input(password, MAX_PASSWORD_LENGTH))
    }
}

fn prompt_line(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

pub fn prompt_name() -> Result<String> {
    prompt_line("Full name: ")
}

/// Drop control characters and cap the length
pub fn clamp_input(input: String, max_len: usize) -> String {
    input
        .chars()
        .filter(|c| !c.is_control())
        .take(max_len)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use docdeck_core::{Route, Transition};

    fn app(allow_placeholder: bool) -> App {
        let config = Config {
            allow_placeholder_token: allow_placeholder,
            ..Config::default()
        };
        App::with_config(config, None, StorageKind::Memory)
    }

    fn signup_form() -> SignupForm {
        SignupForm {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "engine1".to_string(),
            confirm_password: "engine1".to_string(),
        }
    }

    #[test]
    fn test_clamp_input() {
        assert_eq!(clamp_input("a\tb\nc".to_string(), 10), "abc");
        assert_eq!(clamp_input("abcdef".to_string(), 3), "abc");
    }

    #[tokio::test]
    async fn test_login_rejects_empty_fields() {
        let mut app = app(true);
        app.bootstrap().await;
        assert!(app
            .attempt_login(LoginCredentials::new("", "x"))
            .await
            .is_err());
        assert_eq!(
            app.login_error.as_deref(),
            Some("Please enter your email address")
        );
        assert!(!app.store.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_invalid_credentials() {
        let mut app = app(true);
        app.bootstrap().await;
        assert!(app
            .attempt_login(LoginCredentials::new("razin@example.com", "wrong"))
            .await
            .is_err());
        assert_eq!(
            app.login_error.as_deref(),
            Some("Invalid credentials. Please try again.")
        );
    }

    #[tokio::test]
    async fn test_demo_login_and_logout() {
        let mut app = app(true);
        app.bootstrap().await;
        assert_eq!(app.decision().initial_route(), Some(Route::Login));

        app.attempt_login(LoginCredentials::new("razin@example.com", "password123"))
            .await
            .unwrap();
        assert_eq!(app.store.snapshot().token(), Some("mock-jwt-token"));
        assert_eq!(app.decision(), NavigationDecision::Authenticated);
        assert!(app.login_error.is_none());
        assert_eq!(app.config.last_email.as_deref(), Some("razin@example.com"));

        app.logout().await.unwrap();
        assert_eq!(
            app.decision(),
            NavigationDecision::Unauthenticated {
                transition: Transition::Pop
            }
        );
    }

    #[tokio::test]
    async fn test_last_email_saved_to_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut app = App::with_config(Config::default(), Some(path.clone()), StorageKind::Memory);
        app.bootstrap().await;

        app.attempt_login(LoginCredentials::new("razin@example.com", "password123"))
            .await
            .unwrap();

        let saved = Config::load_from(&path).unwrap();
        assert_eq!(saved.last_email.as_deref(), Some("razin@example.com"));
    }

    #[tokio::test]
    async fn test_failure_report_labels_fields() {
        let mut app = app(true);
        app.bootstrap().await;
        let form = SignupForm {
            confirm_password: "engine2".to_string(),
            ..signup_form()
        };
        let err = app.attempt_signup(form).await.unwrap_err();
        assert_eq!(
            app.failure_report(err).to_string(),
            "Confirm password: Passwords do not match"
        );
    }

    #[tokio::test]
    async fn test_failure_report_uses_login_error() {
        let mut app = app(true);
        app.bootstrap().await;
        let err = app
            .attempt_login(LoginCredentials::new("razin@example.com", "wrong"))
            .await
            .unwrap_err();
        assert!(app.validation_errors.is_none());
        assert_eq!(
            app.failure_report(err).to_string(),
            "Invalid credentials. Please try again."
        );
    }

    #[tokio::test]
    async fn test_signup_uses_placeholder_in_demo_mode() {
        let mut app = app(true);
        app.bootstrap().await;
        app.attempt_signup(signup_form()).await.unwrap();
        assert_eq!(app.store.snapshot().token(), Some("mock-auth-token"));
    }

    #[tokio::test]
    async fn test_signup_rejected_without_placeholder() {
        let mut app = app(false);
        app.bootstrap().await;
        assert!(app.attempt_signup(signup_form()).await.is_err());
        assert_eq!(
            app.login_error.as_deref(),
            Some("Failed to register. Please try again.")
        );
        assert!(!app.store.snapshot().is_authenticated());
    }
}
