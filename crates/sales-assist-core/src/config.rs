//! Client configuration.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. `~/.config/sales-assist/config.toml` (or an explicit path)
//! 3. environment variables (`SALES_ASSIST_BACKEND_URL`, `SALES_ASSIST_TIMEOUT_SECS`,
//!    `SALES_ASSIST_USER`)
//! 4. command-line flags, applied by the binary

use crate::error::{AssistError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const ENV_BACKEND_URL: &str = "SALES_ASSIST_BACKEND_URL";
pub const ENV_TIMEOUT_SECS: &str = "SALES_ASSIST_TIMEOUT_SECS";
pub const ENV_USER: &str = "SALES_ASSIST_USER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash.
    pub backend_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// User identifier used for login when none is typed.
    pub user_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_id: None,
        }
    }
}

impl ClientConfig {
    /// Loads defaults, the config file and the environment, then validates.
    ///
    /// A missing file at the default location is not an error; a missing file
    /// at an explicit path is.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit_path, |key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::load`] with an explicit environment lookup.
    pub fn load_with<F>(explicit_path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env_with(lookup)?;
        config.validate()
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AssistError::config(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: ClientConfig = toml::from_str(&content)?;
        tracing::debug!("[ClientConfig] Loaded {}", path.display());
        Ok(config)
    }

    /// Overrides fields from environment-style lookups.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BACKEND_URL) {
            self.backend_url = url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = raw.trim().parse().map_err(|_| {
                AssistError::config(format!("{ENV_TIMEOUT_SECS} must be a number, got '{raw}'"))
            })?;
        }
        if let Some(user) = lookup(ENV_USER) {
            self.user_id = Some(user);
        }
        Ok(())
    }

    /// Normalizes the URL and rejects unusable values.
    pub fn validate(mut self) -> Result<Self> {
        self.backend_url = self.backend_url.trim().trim_end_matches('/').to_string();
        if self.backend_url.is_empty() {
            return Err(AssistError::config("backend_url must not be empty"));
        }
        if !(self.backend_url.starts_with("http://") || self.backend_url.starts_with("https://")) {
            return Err(AssistError::config(format!(
                "backend_url must start with http:// or https://, got '{}'",
                self.backend_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(AssistError::config("request_timeout_secs must be greater than 0"));
        }
        if self.user_id.as_deref().is_some_and(|u| u.trim().is_empty()) {
            self.user_id = None;
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// `~/.config/sales-assist/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("sales-assist").join("config.toml"))
}
