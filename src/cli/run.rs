//! Run command implementation

use log::{info, warn};

use crate::cli::{CommandContext, GlobalOptions, RunArgs};
use crate::client::PulpClient;
use crate::error::{Error, Result};
use crate::fixtures;
use crate::output::Formattable;
use crate::scenario::{ScenarioKind, ScenarioReport, content_unit, referenced_content};

/// Run the selected scenarios, print the report and fail on any failed step
pub async fn run(opts: &GlobalOptions, args: &RunArgs) -> Result<()> {
    let ctx = CommandContext::new(opts, args.auth)?;

    let mut reports = Vec::new();
    for kind in args.selected() {
        info!("Running scenario {}", kind);
        reports.push(run_scenario(&ctx, kind).await?);
    }

    reports.print(ctx.format)?;

    let failures: usize = reports.iter().map(ScenarioReport::failure_count).sum();
    if failures > 0 {
        return Err(Error::ScenarioFailed(failures));
    }
    Ok(())
}

/// Run one scenario with its own auth selection.
///
/// Setup failures become report entries; only configuration errors abort.
async fn run_scenario(ctx: &CommandContext, kind: ScenarioKind) -> Result<ScenarioReport> {
    if let Some(reason) = ctx.config.unsupported_reason()? {
        warn!("Skipping {}: {}", kind, reason);
        return Ok(ScenarioReport::skipped(kind, &reason));
    }

    let client = match ctx.authenticated_client().await {
        Ok(client) => client,
        Err(err) => return Ok(ScenarioReport::setup_failed(kind, "select_auth", &err)),
    };
    let auth = client.auth().map(|strategy| strategy.kind());

    let report = match kind {
        ScenarioKind::ContentUnit => run_content_unit(ctx, &client).await?,
        ScenarioKind::ReferencedContent => referenced_content::run(&client, &ctx.config).await,
    };
    Ok(report.with_auth(auth))
}

async fn run_content_unit(ctx: &CommandContext, client: &PulpClient) -> Result<ScenarioReport> {
    let url = ctx.config.file_url()?;
    match fixtures::http_get(&ctx.config, &url).await {
        Ok(fixture) => Ok(content_unit::run(client, &ctx.config, &fixture).await),
        Err(err) => Ok(ScenarioReport::setup_failed(
            ScenarioKind::ContentUnit,
            "download_fixture",
            &err,
        )),
    }
}
