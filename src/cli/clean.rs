//! Clean-artifacts command implementation

use colored::Colorize;
use serde::Serialize;

use crate::cli::{CommandContext, GlobalOptions, OutputFormat};
use crate::error::Result;
use crate::output::Formattable;
use crate::output::json::format_json;
use crate::scenario::content_unit::clean_artifacts;

#[derive(Debug, Clone, Serialize)]
pub struct CleanSummary {
    pub removed: usize,
}

impl Formattable for CleanSummary {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(format_json(self)?),
            OutputFormat::Pretty | OutputFormat::Table => Ok(format!(
                "{} Removed {} artifact(s)",
                "✓".green(),
                self.removed
            )),
        }
    }
}

/// Delete every artifact on the server
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts, None)?;
    let client = ctx.authenticated_client().await?;
    let removed = clean_artifacts(&client).await?;
    CleanSummary { removed }.print(ctx.format)
}
