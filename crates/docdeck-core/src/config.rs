//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! keychain naming, the demo-mode token policy, the mock backend's demo
//! account, and the last email used to sign in.
//!
//! Configuration is stored at `~/.config/docdeck/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::mock::{DEMO_EMAIL, DEMO_PASSWORD};
use crate::auth::{MissingTokenPolicy, DEFAULT_SERVICE, TOKEN_KEY};

/// Application name used for config directory paths
pub const APP_NAME: &str = "docdeck";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Keychain service the token entry lives under
    pub keyring_service: String,
    /// Key of the token slot
    pub token_key: String,
    /// Substitute a placeholder when the backend returns no token
    pub allow_placeholder_token: bool,
    pub last_email: Option<String>,
    pub demo_email: String,
    /// Read from the file when present but never written back
    #[serde(skip_serializing)]
    pub demo_password: String,
    /// Directory for rolling log files; stderr only when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keyring_service: DEFAULT_SERVICE.to_string(),
            token_key: TOKEN_KEY.to_string(),
            allow_placeholder_token: true,
            last_email: None,
            demo_email: DEMO_EMAIL.to_string(),
            demo_password: DEMO_PASSWORD.to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn missing_token_policy(&self) -> MissingTokenPolicy {
        if self.allow_placeholder_token {
            MissingTokenPolicy::Placeholder
        } else {
            MissingTokenPolicy::Reject
        }
    }

    /// `<config dir>/docdeck/config.json`
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}
