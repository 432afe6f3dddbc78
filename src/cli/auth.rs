//! Auth command implementation

use colored::Colorize;
use serde::Serialize;

use crate::auth::{AuthKind, AuthMode};
use crate::cli::{AuthArgs, CommandContext, GlobalOptions, OutputFormat};
use crate::error::{Error, Result};
use crate::output::Formattable;
use crate::output::json::format_json;

/// Outcome of a strategy selection
#[derive(Debug, Clone, Serialize)]
pub struct AuthSelection {
    pub mode: AuthMode,
    pub strategy: AuthKind,
    pub username: String,
}

impl Formattable for AuthSelection {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(format_json(self)?),
            OutputFormat::Pretty | OutputFormat::Table => Ok(format!(
                "{} Selected {} authentication for {} (mode: {:?})",
                "✓".green(),
                self.strategy.to_string().bold(),
                self.username,
                self.mode
            )),
        }
    }
}

/// Select a strategy against the server and report which variant was used
pub async fn run(opts: &GlobalOptions, args: &AuthArgs) -> Result<()> {
    let ctx = CommandContext::new(opts, args.auth)?;
    let client = ctx.authenticated_client().await?;
    let strategy = client
        .auth()
        .map(|s| s.kind())
        .ok_or_else(|| Error::Other("no strategy was selected".to_string()))?;

    AuthSelection {
        mode: ctx.config.auth_mode,
        strategy,
        username: ctx.config.auth.username.clone(),
    }
    .print(ctx.format)
}
