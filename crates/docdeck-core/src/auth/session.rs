use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

#[cfg(feature = "ts")]
use ts_rs::TS;

use super::storage::{SecureStorage, TOKEN_KEY};
use super::{CredentialRecord, MissingTokenPolicy, SessionError};

/// Snapshot of the authentication state.
///
/// `loading` is true from process start until the first `bootstrap()`
/// completes and never returns to true afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub struct Session {
    pub token: Option<String>,
    pub loading: bool,
    pub just_signed_out: bool,
}

impl Session {
    /// State at process start, before the stored token has been read
    pub fn initial() -> Self {
        Self {
            token: None,
            loading: true,
            just_signed_out: false,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.token.is_some()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::initial()
    }
}

/// Which external call produced a credential; only used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CredentialSource {
    SignIn,
    SignUp,
}

impl CredentialSource {
    fn as_str(&self) -> &'static str {
        match self {
            CredentialSource::SignIn => "sign_in",
            CredentialSource::SignUp => "sign_up",
        }
    }
}

/// Owns the session token and keeps it in sync with secure storage.
///
/// Storage is authoritative: a mutation is only reflected in the published
/// `Session` after the corresponding storage write or delete succeeded.
/// Every committed change is broadcast to `subscribe()` receivers.
pub struct SessionStore {
    storage: Arc<dyn SecureStorage>,
    token_key: String,
    policy: MissingTokenPolicy,
    state: watch::Sender<Session>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SecureStorage>) -> Self {
        let (state, _) = watch::channel(Session::initial());
        Self {
            storage,
            token_key: TOKEN_KEY.to_string(),
            policy: MissingTokenPolicy::default(),
            state,
        }
    }

    /// Use a different storage key for the token slot
    pub fn with_token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = key.into();
        self
    }

    pub fn with_missing_token_policy(mut self, policy: MissingTokenPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn missing_token_policy(&self) -> MissingTokenPolicy {
        self.policy
    }

    /// Current session state
    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver notified after every committed state change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Read the persisted token and leave the loading state.
    ///
    /// A failed read is logged and treated as "no token"; bootstrap itself
    /// never fails.
    pub async fn bootstrap(&self) -> Session {
        let token = match self.storage.get(&self.token_key).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to read token from storage, starting signed out");
                None
            }
        };

        debug!(has_token = token.is_some(), "Session bootstrapped");
        self.state.send_modify(|session| {
            session.token = token;
            session.loading = false;
        });
        self.snapshot()
    }

    /// Persist the token from a sign-in response and mark the session authenticated
    pub async fn sign_in(&self, credential: &CredentialRecord) -> Result<(), SessionError> {
        self.apply_credential(credential, CredentialSource::SignIn)
            .await
    }

    /// Persist the token from a sign-up response and mark the session authenticated
    pub async fn sign_up(&self, credential: &CredentialRecord) -> Result<(), SessionError> {
        self.apply_credential(credential, CredentialSource::SignUp)
            .await
    }

    /// Delete the persisted token and mark the session signed out
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        if let Err(e) = self.storage.delete(&self.token_key).await {
            error!(error = %e, "Error signing out");
            return Err(e.into());
        }

        self.state.send_modify(|session| {
            session.token = None;
            session.just_signed_out = true;
        });
        info!("Signed out");
        Ok(())
    }

    async fn apply_credential(
        &self,
        credential: &CredentialRecord,
        source: CredentialSource,
    ) -> Result<(), SessionError> {
        let Some(token) = credential.resolve_token(self.policy) else {
            warn!(source = source.as_str(), "Credential has no token, session unchanged");
            return Err(SessionError::MissingToken);
        };

        if let Err(e) = self.storage.set(&self.token_key, &token).await {
            error!(source = source.as_str(), error = %e, "Failed to persist token");
            return Err(e.into());
        }

        self.state.send_modify(|session| {
            session.token = Some(token);
            session.just_signed_out = false;
        });
        info!(source = source.as_str(), user_id = credential.user.id, "Session authenticated");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
