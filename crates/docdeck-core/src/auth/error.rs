use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Secure storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to read key {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    #[error("Failed to write key {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    #[error("Failed to delete key {key}: {reason}")]
    DeleteFailed { key: String, reason: String },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Authentication response did not include a token")]
    MissingToken,
}

impl SessionError {
    /// True when the failure came from the secure storage collaborator
    pub fn is_storage(&self) -> bool {
        matches!(self, SessionError::Storage(_))
    }
}
