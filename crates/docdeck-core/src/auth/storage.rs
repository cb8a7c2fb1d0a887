//! Secure key-value storage for the session token.
//!
//! `KeyringStorage` writes to the OS keychain (Keychain on macOS/iOS,
//! Credential Manager on Windows, kernel keyutils on Linux).
//! `MemoryStorage` keeps values in process memory and is used for
//! ephemeral sessions and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use super::StorageError;

/// Key under which the session token is persisted
pub const TOKEN_KEY: &str = "userToken";

/// Keychain service name for docdeck entries
pub const DEFAULT_SERVICE: &str = "docdeck";

/// Async get/set/delete over a single secure key-value namespace.
///
/// Deleting a key that does not exist is not an error.
#[async_trait]
pub trait SecureStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

// ============================================================================
// Keychain
// ============================================================================

#[derive(Debug, Clone)]
pub struct KeyringStorage {
    service: String,
}

impl KeyringStorage {
    pub fn new() -> Self {
        Self::with_service(DEFAULT_SERVICE)
    }

    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(service: &str, key: &str) -> Result<keyring::Entry, StorageError> {
        keyring::Entry::new(service, key).map_err(|e| StorageError::Unavailable(e.to_string()))
    }

    /// Run a blocking keychain call off the async executor
    async fn run_blocking<T, F>(&self, key: &str, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(keyring::Entry) -> Result<T, StorageError> + Send + 'static,
    {
        let entry = Self::entry(&self.service, key)?;
        tokio::task::spawn_blocking(move || op(entry))
            .await
            .map_err(|e| StorageError::Unavailable(format!("keychain task failed: {}", e)))?
    }
}

impl Default for KeyringStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecureStorage for KeyringStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let owned_key = key.to_string();
        let value = self
            .run_blocking(key, move |entry| match entry.get_password() {
                Ok(value) => Ok(Some(value)),
                Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(StorageError::ReadFailed {
                    key: owned_key,
                    reason: e.to_string(),
                }),
            })
            .await?;
        debug!(key, found = value.is_some(), "Keychain read");
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let owned_key = key.to_string();
        let value = value.to_string();
        self.run_blocking(key, move |entry| {
            entry
                .set_password(&value)
                .map_err(|e| StorageError::WriteFailed {
                    key: owned_key,
                    reason: e.to_string(),
                })
        })
        .await?;
        debug!(key, "Keychain write");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let owned_key = key.to_string();
        self.run_blocking(key, move |entry| match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed {
                key: owned_key,
                reason: e.to_string(),
            }),
        })
        .await?;
        debug!(key, "Keychain delete");
        Ok(())
    }
}

// ============================================================================
// In-memory
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `value` under `key`
    pub fn seeded(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        Self {
            values: Mutex::new(values),
        }
    }
}

#[async_trait]
impl SecureStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.values.lock().await.remove(key);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_get_missing() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_storage_set_get_delete() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "abc").await.unwrap();
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap().as_deref(), Some("abc"));

        storage.delete(TOKEN_KEY).await.unwrap();
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_storage_delete_missing_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.delete("nothing-here").await.is_ok());
    }

    #[tokio::test]
    async fn test_memory_storage_seeded() {
        let storage = MemoryStorage::seeded(TOKEN_KEY, "seed");
        assert_eq!(storage.get(TOKEN_KEY).await.unwrap().as_deref(), Some("seed"));
        assert_eq!(storage.get("other").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_keyring_storage_absent_key() {
        // In-process keyring backend; every entry starts out empty
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        let storage = KeyringStorage::with_service("docdeck-test-absent");

        assert_eq!(storage.get("missing-token").await.unwrap(), None);
        assert!(storage.delete("missing-token").await.is_ok());
        assert!(storage.set("missing-token", "value").await.is_ok());
    }

    // Requires a working OS keychain.
    #[tokio::test]
    #[ignore]
    async fn test_keyring_storage_roundtrip() {
        let storage = KeyringStorage::with_service("docdeck-test");
        storage.set("test-token", "value-123").await.unwrap();
        assert_eq!(
            storage.get("test-token").await.unwrap().as_deref(),
            Some("value-123")
        );
        storage.delete("test-token").await.unwrap();
        assert_eq!(storage.get("test-token").await.unwrap(), None);
    }
}
