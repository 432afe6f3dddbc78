//! CLI command definitions and handlers

use clap::{Args, Parser, Subcommand};

use crate::auth::AuthMode;
use crate::scenario::ScenarioKind;

pub mod args;
pub mod auth;
pub mod clean;
pub mod context;
pub mod run;
pub mod status;

pub use args::{GlobalOptions, OutputFormat};
pub use context::CommandContext;

/// pulpcheck - integration checks for the Pulp 3 content API
#[derive(Parser, Debug)]
#[command(name = "pulpcheck")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, table, json)
    #[arg(
        long,
        global = true,
        env = "PULPCHECK_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "PULPCHECK_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Override the Pulp server base URL
    #[arg(long, global = true, env = "PULPCHECK_BASE_URL", hide_env = true)]
    pub base_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "PULPCHECK_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against the configured server
    Run(RunArgs),

    /// Select an authentication strategy and report which one was used
    Auth(AuthArgs),

    /// Show the resolved configuration
    Status,

    /// Delete every artifact on the server
    CleanArtifacts,

    /// Display version information
    Version,
}

/// Arguments for `run`
#[derive(Debug, Clone, Args, Default)]
pub struct RunArgs {
    /// Scenario to run (repeatable, all when omitted)
    #[arg(long = "scenario", value_enum)]
    pub scenarios: Vec<ScenarioKind>,

    /// Authentication mode (basic, jwt, random)
    #[arg(long, value_enum, env = "PULPCHECK_AUTH", hide_env = true)]
    pub auth: Option<AuthMode>,
}

impl RunArgs {
    /// Requested scenarios in order without repeats, or all of them
    pub fn selected(&self) -> Vec<ScenarioKind> {
        if self.scenarios.is_empty() {
            return ScenarioKind::ALL.to_vec();
        }
        let mut selected = Vec::new();
        for kind in &self.scenarios {
            if !selected.contains(kind) {
                selected.push(*kind);
            }
        }
        selected
    }
}

/// Arguments for `auth`
#[derive(Debug, Clone, Args, Default)]
pub struct AuthArgs {
    /// Authentication mode (basic, jwt, random)
    #[arg(long, value_enum, env = "PULPCHECK_AUTH", hide_env = true)]
    pub auth: Option<AuthMode>,
}
