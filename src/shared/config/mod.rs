//! Application configuration module
//!
//! Provides configuration types for the sync subsystem. Values come from
//! builder calls, an optional TOML file, or the environment (see
//! [`crate::client::config::Config`]).

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default backend URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";
/// Default quiescence window before a debounced remote write
pub const DEFAULT_SYNC_DELAY: Duration = Duration::from_millis(1500);
/// Default per-request timeout owned by the HTTP gateway
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Default local storage namespace
pub const DEFAULT_NAMESPACE: &str = "fintrack";

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Backend URL
    pub server_url: String,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
    /// Quiescence window of the sync scheduler
    pub sync_delay: Duration,
    /// Prefix of every local storage key
    pub storage_namespace: String,
    /// Directory of the file-backed local store; platform data dir when unset
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            sync_delay: DEFAULT_SYNC_DELAY,
            storage_namespace: DEFAULT_NAMESPACE.to_string(),
            data_dir: None,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.server_url.clone()));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.storage_namespace.trim().is_empty() {
            return Err(ConfigError::MissingValue("storage_namespace"));
        }
        Ok(())
    }

    /// Directory used by the file-backed local store
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
            path.push(&self.storage_namespace);
            path
        })
    }
}

/// Builder for AppConfig
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    request_timeout_ms: Option<u64>,
    sync_delay_ms: Option<u64>,
    storage_namespace: Option<String>,
    data_dir: Option<PathBuf>,
}

impl AppConfigBuilder {
    /// Seed a builder from a TOML document; unspecified keys keep defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the backend request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Set the quiescence window of the sync scheduler
    pub fn sync_delay(mut self, delay: Duration) -> Self {
        self.sync_delay_ms = Some(delay.as_millis() as u64);
        self
    }

    /// Set the local storage namespace
    pub fn storage_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.storage_namespace = Some(namespace.into());
        self
    }

    /// Set the directory of the file-backed local store
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            server_url: self
                .server_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.server_url),
            request_timeout: self
                .request_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            sync_delay: self
                .sync_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.sync_delay),
            storage_namespace: self
                .storage_namespace
                .unwrap_or(defaults.storage_namespace),
            data_dir: self.data_dir.or(defaults.data_dir),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("failed to read configuration file: {0}")]
    Io(String),
}
