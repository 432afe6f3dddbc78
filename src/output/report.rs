//! Rendering of scenario reports

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use super::Formattable;
use super::json::format_json;
use super::table::format_table;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::scenario::{ScenarioReport, StepOutcome};

/// Step row for table output
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct StepRow {
    #[tabled(rename = "SCENARIO")]
    pub scenario: String,

    #[tabled(rename = "AUTH")]
    pub auth: String,

    #[tabled(rename = "STEP")]
    pub step: String,

    #[tabled(rename = "STATUS")]
    pub status: String,

    #[tabled(rename = "DETAIL")]
    pub detail: String,
}

impl StepRow {
    fn rows(report: &ScenarioReport) -> Vec<StepRow> {
        let auth = report
            .auth
            .map(|kind| kind.to_string())
            .unwrap_or_else(|| "-".to_string());
        let row = |step: &str, status: &str, detail: &str| StepRow {
            scenario: report.scenario.to_string(),
            auth: auth.clone(),
            step: step.to_string(),
            status: status.to_string(),
            detail: detail.to_string(),
        };

        let mut rows: Vec<StepRow> = report
            .steps
            .iter()
            .map(|step| match &step.outcome {
                StepOutcome::Passed => row(&step.name, "passed", ""),
                StepOutcome::Skipped { reason } => row(&step.name, "skipped", reason),
                StepOutcome::Failed { error } => row(&step.name, "failed", error),
            })
            .collect();
        rows.extend(
            report
                .cleanup_errors
                .iter()
                .map(|err| row("cleanup", "failed", err)),
        );
        rows
    }
}

impl Formattable for Vec<ScenarioReport> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Pretty => Ok(format_pretty(self)),
            OutputFormat::Table => {
                let rows: Vec<StepRow> = self.iter().flat_map(StepRow::rows).collect();
                Ok(format_table(&rows))
            }
            OutputFormat::Json => Ok(format_json(self)?),
        }
    }
}

fn format_pretty(reports: &[ScenarioReport]) -> String {
    let mut out = String::new();
    for report in reports {
        let auth = match report.auth {
            Some(kind) => format!(" (auth: {})", kind),
            None => String::new(),
        };
        out.push_str(&format!(
            "{}{}\n",
            report.scenario.to_string().bold(),
            auth.dimmed()
        ));

        for step in &report.steps {
            let line = match &step.outcome {
                StepOutcome::Passed => format!("  {} {}", "✓".green(), step.name),
                StepOutcome::Failed { error } => {
                    format!("  {} {}: {}", "✗".red(), step.name, error.red())
                }
                StepOutcome::Skipped { reason } => format!(
                    "  {} {} {}",
                    "○".dimmed(),
                    step.name,
                    format!("({})", reason).dimmed()
                ),
            };
            out.push_str(&line);
            out.push('\n');
        }
        for err in &report.cleanup_errors {
            out.push_str(&format!("  {} cleanup: {}\n", "✗".red(), err.red()));
        }
        out.push('\n');
    }

    let passed: usize = reports.iter().map(ScenarioReport::passed_count).sum();
    let failed: usize = reports.iter().map(ScenarioReport::failure_count).sum();
    let skipped: usize = reports.iter().map(ScenarioReport::skipped_count).sum();
    let failed_text = format!("{} failed", failed);
    out.push_str(&format!(
        "{} passed, {}, {} skipped",
        passed.to_string().green(),
        if failed > 0 { failed_text.red() } else { failed_text.normal() },
        skipped
    ));
    out
}
