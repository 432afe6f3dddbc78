//! Command execution context
//!
//! Loads configuration once, applies CLI/environment overrides and builds
//! clients for the command handlers.

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::auth::{AuthMode, get_auth, select_auth};
use crate::cli::{GlobalOptions, OutputFormat};
use crate::client::PulpClient;
use crate::config::Config;
use crate::error::Result;

/// Context for command execution containing config and runtime options.
pub struct CommandContext {
    /// Loaded, overridden and validated configuration
    pub config: Config,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Load config from `opts` and apply overrides.
    ///
    /// # Errors
    /// Returns error if config cannot be loaded or is invalid after overrides.
    pub fn new(opts: &GlobalOptions, auth_mode: Option<AuthMode>) -> Result<Self> {
        let config = Config::load_at(opts.config_ref())?
            .with_overrides(opts.base_url_ref(), auth_mode)?;
        debug!(
            "Using {} (API v{}, auth mode {:?})",
            config.base_url, config.api_version, config.auth_mode
        );

        Ok(Self {
            config,
            format: opts.format,
        })
    }

    /// Client without credentials, for token issuance
    pub fn client(&self) -> Result<PulpClient> {
        PulpClient::new(&self.config)
    }

    /// Client carrying a strategy selected per the configured auth mode
    pub async fn authenticated_client(&self) -> Result<PulpClient> {
        let client = self.client()?;
        let auth = match self.config.auth_mode {
            AuthMode::Random => get_auth(&self.config, &client).await?,
            mode => select_auth(&self.config, &client, mode, &mut StdRng::from_entropy()).await?,
        };
        Ok(client.with_auth(auth))
    }
}
