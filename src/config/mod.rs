//! Configuration management for pulpcheck
//!
//! The config is loaded once per process and never mutated afterwards.
//! Environment and CLI overrides are applied by [`Config::with_overrides`]
//! before it is handed to the client.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::auth::AuthMode;
use crate::error::{ConfigError, Result};

/// Lowest server major version the scenarios apply to
pub const MIN_API_MAJOR: u64 = 3;

/// Default location of the public fixture feeds
pub const DEFAULT_FIXTURES_URL: &str = "https://repos.fedorapeople.org/pulp/pulp/fixtures/";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server root, e.g. `http://localhost:8000`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Server version under test, e.g. `3` or `3.0.0b1`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Credential pair used for Basic auth and token issuance
    pub auth: Credentials,

    /// Strategy selection mode
    #[serde(default)]
    pub auth_mode: AuthMode,

    /// Base URL of the fixture feeds
    #[serde(default = "default_fixtures_url")]
    pub fixtures_url: String,

    /// Per-request transport timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Delay between task status polls
    #[serde(default = "default_task_poll_interval_ms")]
    pub task_poll_interval_ms: u64,

    /// Upper bound on waiting for a spawned task
    #[serde(default = "default_task_timeout_secs")]
    pub task_timeout_secs: u64,

    /// Delete every artifact before uploading the lifecycle fixture
    #[serde(default = "default_clean_artifacts")]
    pub clean_artifacts: bool,
}

/// Username/password pair
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_version() -> String {
    "3".to_string()
}

fn default_fixtures_url() -> String {
    DEFAULT_FIXTURES_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_task_poll_interval_ms() -> u64 {
    500
}

fn default_task_timeout_secs() -> u64 {
    300
}

fn default_clean_artifacts() -> bool {
    true
}

impl Config {
    /// Build a config with defaults around a credential pair
    #[cfg(test)]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            auth: Credentials {
                username: username.into(),
                password: password.into(),
            },
            auth_mode: AuthMode::default(),
            fixtures_url: default_fixtures_url(),
            timeout_secs: default_timeout_secs(),
            task_poll_interval_ms: default_task_poll_interval_ms(),
            task_timeout_secs: default_task_timeout_secs(),
            clean_artifacts: default_clean_artifacts(),
        }
    }

    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".pulpcheck").join("config.yaml"))
    }

    /// Resolve an optional explicit path against the default location
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load configuration from an explicit path or the default one
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        Self::load_from(Self::resolve_path(path)?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(&path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI/environment overrides, returning the final config
    pub fn with_overrides(
        mut self,
        base_url: Option<&str>,
        auth_mode: Option<AuthMode>,
    ) -> Result<Self> {
        if let Some(url) = base_url {
            self.base_url = url.to_string();
        }
        if let Some(mode) = auth_mode {
            self.auth_mode = mode;
        }
        self.validate()?;
        Ok(self)
    }

    /// Validate that required configuration is present and well formed
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url is empty".to_string()).into());
        }
        Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url '{}': {}", self.base_url, e)))?;
        Url::parse(&self.fixtures_url).map_err(|e| {
            ConfigError::Invalid(format!("fixtures_url '{}': {}", self.fixtures_url, e))
        })?;
        if self.auth.username.is_empty() {
            return Err(ConfigError::MissingCredentials.into());
        }
        if self.task_poll_interval_ms == 0 {
            return Err(
                ConfigError::Invalid("task_poll_interval_ms must be positive".to_string()).into(),
            );
        }
        self.api_major()?;
        Ok(())
    }

    /// Major component of the configured API version
    pub fn api_major(&self) -> Result<u64> {
        let version = self.api_version.trim();
        let major = version.split('.').next().unwrap_or_default();
        major
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidVersion(version.to_string()).into())
    }

    /// Reason the scenarios do not apply to this server, if any
    pub fn unsupported_reason(&self) -> Result<Option<String>> {
        let major = self.api_major()?;
        if major < MIN_API_MAJOR {
            return Ok(Some(format!(
                "scenarios target Pulp {} or newer, but Pulp {} is under test",
                MIN_API_MAJOR, self.api_version
            )));
        }
        Ok(None)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn task_poll_interval(&self) -> Duration {
        Duration::from_millis(self.task_poll_interval_ms)
    }

    pub fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_secs)
    }

    /// URL of the file feed directory
    pub fn file_feed_url(&self) -> Result<Url> {
        let mut base = Url::parse(&self.fixtures_url)
            .map_err(|e| ConfigError::Invalid(format!("fixtures_url: {}", e)))?;
        // Joining replaces the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join("file/")
            .map_err(|e| ConfigError::Invalid(format!("fixtures_url: {}", e)).into())
    }

    /// Manifest a file remote syncs from
    pub fn file_manifest_url(&self) -> Result<Url> {
        self.file_feed_url()?
            .join("PULP_MANIFEST")
            .map_err(|e| ConfigError::Invalid(format!("fixtures_url: {}", e)).into())
    }

    /// Single file uploaded as the lifecycle artifact
    pub fn file_url(&self) -> Result<Url> {
        self.file_feed_url()?
            .join("1.iso")
            .map_err(|e| ConfigError::Invalid(format!("fixtures_url: {}", e)).into())
    }
}
