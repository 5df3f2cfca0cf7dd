use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use std::path::Path;
use std::time::Duration;

/// Identity handed in by the external identity provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    pub user_id: Option<String>,
    pub token: Option<String>,
}

impl Identity {
    pub fn authenticated(user_id: impl Into<String>, token: Option<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            token,
        }
    }

    /// A session is authenticated once a user id has been resolved
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Application configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
    identity: Identity,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            identity: Identity::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        Ok(Self {
            app,
            identity: Identity::default(),
        })
    }

    /// Load configuration: optional TOML file, then environment overrides.
    ///
    /// Recognised variables: `FINTRACK_CONFIG` (TOML path), `FINTRACK_API_URL`,
    /// `FINTRACK_DATA_DIR`, `FINTRACK_SYNC_DELAY_MS`, `FINTRACK_USER_ID`,
    /// `FINTRACK_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = match std::env::var("FINTRACK_CONFIG") {
            Ok(path) => Self::read_toml(Path::new(&path))?,
            Err(_) => AppConfigBuilder::default(),
        };

        if let Ok(url) = std::env::var("FINTRACK_API_URL") {
            builder = builder.server_url(url);
        }
        if let Ok(dir) = std::env::var("FINTRACK_DATA_DIR") {
            builder = builder.data_dir(dir);
        }
        if let Ok(delay) = std::env::var("FINTRACK_SYNC_DELAY_MS") {
            let millis = delay.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                field: "FINTRACK_SYNC_DELAY_MS",
                message: e.to_string(),
            })?;
            builder = builder.sync_delay(Duration::from_millis(millis));
        }

        let mut config = Self::with_builder(builder)?;
        if let Ok(user_id) = std::env::var("FINTRACK_USER_ID") {
            config.set_identity(Identity::authenticated(
                user_id,
                std::env::var("FINTRACK_TOKEN").ok(),
            ));
        }
        Ok(config)
    }

    fn read_toml(path: &Path) -> Result<AppConfigBuilder, ConfigError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        AppConfigBuilder::from_toml_str(&source)
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Set the identity resolved by the identity provider
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = identity;
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Get the bearer token
    pub fn get_token(&self) -> Option<&String> {
        self.identity.token.as_ref()
    }

    /// Clear the identity (logout)
    pub fn clear_identity(&mut self) {
        self.identity = Identity::default();
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn server_url(&self) -> &str {
        &self.app.server_url
    }
}
