//! Scenario runner types
//!
//! A scenario is an ordered list of steps over server objects. Each step
//! passes, fails, or is skipped when the object it depends on was never
//! established. Objects a scenario creates are registered with a
//! [`cleanup::CleanupRegistry`] that always runs once the steps are over.

use serde::{Deserialize, Serialize};

use crate::auth::AuthKind;
use crate::error::{ApiError, Error, Result};

pub mod cleanup;
pub mod content_unit;
pub mod referenced_content;

/// Available scenarios
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    /// Create, read, reject updates, delete a file content unit
    ContentUnit,
    /// Content referenced by a repository version cannot be deleted
    ReferencedContent,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 2] = [ScenarioKind::ContentUnit, ScenarioKind::ReferencedContent];

    pub fn name(self) -> &'static str {
        match self {
            ScenarioKind::ContentUnit => "content-unit",
            ScenarioKind::ReferencedContent => "referenced-content",
        }
    }

    /// Step names in execution order
    pub fn step_names(self) -> &'static [&'static str] {
        match self {
            ScenarioKind::ContentUnit => content_unit::LifecycleStep::NAMES,
            ScenarioKind::ReferencedContent => referenced_content::GuardStep::NAMES,
        }
    }
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a single step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepOutcome {
    Passed,
    Skipped { reason: String },
    Failed { error: String },
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }
}

/// Named step result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

/// Everything that happened during one scenario run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub scenario: ScenarioKind,

    /// Strategy the scenario ran with; None when selection never happened
    pub auth: Option<AuthKind>,

    pub steps: Vec<StepReport>,

    /// Teardown actions that did not succeed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cleanup_errors: Vec<String>,
}

impl ScenarioReport {
    pub fn new(scenario: ScenarioKind) -> Self {
        Self {
            scenario,
            auth: None,
            steps: Vec::new(),
            cleanup_errors: Vec::new(),
        }
    }

    /// Report where every step was skipped for the same reason
    pub fn skipped(scenario: ScenarioKind, reason: &str) -> Self {
        let mut report = Self::new(scenario);
        for name in scenario.step_names() {
            report.skip(name, reason);
        }
        report
    }

    /// Report for a scenario whose setup failed before any step ran
    pub fn setup_failed(scenario: ScenarioKind, stage: &str, err: &Error) -> Self {
        let mut report = Self::new(scenario);
        report.steps.push(StepReport {
            name: stage.to_string(),
            outcome: StepOutcome::Failed {
                error: err.to_string(),
            },
        });
        for name in scenario.step_names() {
            report.skip(name, &format!("{} failed", stage));
        }
        report
    }

    pub fn with_auth(mut self, auth: Option<AuthKind>) -> Self {
        self.auth = auth;
        self
    }

    /// Record the result of a step
    pub fn record(&mut self, name: &str, result: Result<()>) {
        let outcome = match result {
            Ok(()) => StepOutcome::Passed,
            Err(err) => StepOutcome::Failed {
                error: err.to_string(),
            },
        };
        self.steps.push(StepReport {
            name: name.to_string(),
            outcome,
        });
    }

    pub fn skip(&mut self, name: &str, reason: &str) {
        self.steps.push(StepReport {
            name: name.to_string(),
            outcome: StepOutcome::Skipped {
                reason: reason.to_string(),
            },
        });
    }

    /// Failed steps plus failed cleanups
    pub fn failure_count(&self) -> usize {
        self.steps.iter().filter(|s| s.outcome.is_failed()).count() + self.cleanup_errors.len()
    }

    pub fn passed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.outcome == StepOutcome::Passed)
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.outcome, StepOutcome::Skipped { .. }))
            .count()
    }

    #[cfg(test)]
    pub fn outcome_of(&self, name: &str) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.name == name).map(|s| &s.outcome)
    }
}

/// Assert that `result` is an HTTP error status from the server.
///
/// Success and non-HTTP failures (transport, decoding) are both wrong.
pub fn expect_http_error<T>(result: Result<T>, operation: &str) -> Result<ApiError> {
    match result {
        Ok(_) => Err(Error::Assertion(format!(
            "{} succeeded but the server should have rejected it",
            operation
        ))),
        Err(Error::Api(err)) if err.is_http_error() => Ok(err),
        Err(err) => Err(err),
    }
}

/// Fail with `message` unless `condition` holds
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(Error::Assertion(message()))
    }
}
