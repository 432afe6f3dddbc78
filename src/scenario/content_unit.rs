//! File content unit lifecycle
//!
//! One artifact is uploaded in setup and shared by every step. The unit
//! moves absent -> created -> deleted; updates must be rejected without a
//! state change. Steps that need a created unit are skipped when creation
//! never succeeded.

use log::info;

use super::cleanup::{CleanupRegistry, Resource};
use super::{ScenarioKind, ScenarioReport, ensure, expect_http_error};
use crate::client::PulpApi;
use crate::client::models::{Artifact, FileContent};
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::fixtures::{FixtureFile, gen_content_unit_attrs};

/// Setup stage name used in reports
pub const SETUP: &str = "setup_artifact";

/// Steps in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStep {
    Create,
    Read,
    PartiallyUpdate,
    FullyUpdate,
    Delete,
}

impl LifecycleStep {
    pub const ALL: [LifecycleStep; 5] = [
        LifecycleStep::Create,
        LifecycleStep::Read,
        LifecycleStep::PartiallyUpdate,
        LifecycleStep::FullyUpdate,
        LifecycleStep::Delete,
    ];

    pub const NAMES: &'static [&'static str] = &[
        "01_create_content_unit",
        "02_read_content_unit",
        "03_partially_update",
        "03_fully_update",
        "04_delete_content_unit",
    ];

    pub fn name(self) -> &'static str {
        match self {
            LifecycleStep::Create => Self::NAMES[0],
            LifecycleStep::Read => Self::NAMES[1],
            LifecycleStep::PartiallyUpdate => Self::NAMES[2],
            LifecycleStep::FullyUpdate => Self::NAMES[3],
            LifecycleStep::Delete => Self::NAMES[4],
        }
    }

    fn needs_unit(self) -> bool {
        !matches!(self, LifecycleStep::Create)
    }
}

/// Where the content unit is in its life
#[derive(Debug, Clone, PartialEq)]
pub enum UnitState {
    Absent,
    Created(FileContent),
    Deleted,
}

/// Run the lifecycle scenario with `fixture` as the artifact payload.
pub async fn run<C>(client: &C, config: &Config, fixture: &FixtureFile) -> ScenarioReport
where
    C: PulpApi + ?Sized,
{
    let mut report = ScenarioReport::new(ScenarioKind::ContentUnit);
    let mut cleanup = CleanupRegistry::new();

    match setup(client, config, fixture, &mut cleanup).await {
        Ok(artifact) => {
            report.record(SETUP, Ok(()));
            let mut lifecycle = Lifecycle::new(client, artifact);
            lifecycle.run_steps(&mut report, &mut cleanup).await;
        }
        Err(err) => {
            report.record(SETUP, Err(err));
            for step in LifecycleStep::ALL {
                report.skip(step.name(), "artifact fixture was not created");
            }
        }
    }

    report.cleanup_errors = cleanup.run(client).await;
    report
}

/// Upload the shared artifact and verify the server stored the same bytes
async fn setup<C>(
    client: &C,
    config: &Config,
    fixture: &FixtureFile,
    cleanup: &mut CleanupRegistry,
) -> Result<Artifact>
where
    C: PulpApi + ?Sized,
{
    if config.clean_artifacts {
        clean_artifacts(client).await?;
    }

    let artifact = client.upload_artifact(&fixture.name, &fixture.bytes).await?;
    cleanup.register(Resource::Artifact, &artifact.href);
    info!("Uploaded artifact {}", artifact.href);

    if let Some(sha256) = &artifact.sha256 {
        let expected = fixture.sha256();
        ensure(*sha256 == expected, || {
            format!("artifact sha256 is {}, uploaded bytes hash to {}", sha256, expected)
        })?;
    }
    if let Some(size) = artifact.size {
        ensure(size == fixture.bytes.len() as u64, || {
            format!(
                "artifact size is {}, uploaded {} bytes",
                size,
                fixture.bytes.len()
            )
        })?;
    }
    Ok(artifact)
}

/// Delete every artifact on the server. Returns how many were removed.
pub async fn clean_artifacts<C>(client: &C) -> Result<usize>
where
    C: PulpApi + ?Sized,
{
    let artifacts = client.list_artifacts().await?;
    for artifact in &artifacts {
        client.delete_artifact(&artifact.href).await?;
    }
    info!("Removed {} artifact(s)", artifacts.len());
    Ok(artifacts.len())
}

struct Lifecycle<'a, C: ?Sized> {
    client: &'a C,
    artifact: Artifact,
    state: UnitState,
}

impl<'a, C> Lifecycle<'a, C>
where
    C: PulpApi + ?Sized,
{
    fn new(client: &'a C, artifact: Artifact) -> Self {
        Self {
            client,
            artifact,
            state: UnitState::Absent,
        }
    }

    fn unit(&self) -> Option<&FileContent> {
        match &self.state {
            UnitState::Created(unit) => Some(unit),
            _ => None,
        }
    }

    async fn run_steps(&mut self, report: &mut ScenarioReport, cleanup: &mut CleanupRegistry) {
        for step in LifecycleStep::ALL {
            if step.needs_unit() && self.unit().is_none() {
                report.skip(step.name(), "content unit was never created");
                continue;
            }
            let result = match step {
                LifecycleStep::Create => self.create(cleanup).await,
                LifecycleStep::Read => self.read().await,
                LifecycleStep::PartiallyUpdate => self.partially_update().await,
                LifecycleStep::FullyUpdate => self.fully_update().await,
                LifecycleStep::Delete => self.delete(cleanup).await,
            };
            report.record(step.name(), result);
        }
    }

    /// POST new attributes; every posted attribute must come back unchanged
    async fn create(&mut self, cleanup: &mut CleanupRegistry) -> Result<()> {
        let attrs = gen_content_unit_attrs(&self.artifact);
        let unit = self.client.create_file_content(&attrs).await?;
        cleanup.register(Resource::Content, &unit.href);

        let mismatched = unit.mismatched_attrs(&attrs);
        self.state = UnitState::Created(unit);
        ensure(mismatched.is_empty(), || {
            format!("created unit does not echo {}", mismatched.join(", "))
        })
    }

    /// GET by href; every field recorded at creation must read back unchanged
    async fn read(&self) -> Result<()> {
        let Some(recorded) = self.unit() else {
            return Ok(());
        };
        let fetched = self.client.get_file_content(&recorded.href).await?;
        let drifted = fetched.drifted_fields(recorded);
        ensure(drifted.is_empty(), || {
            format!("read back {} different from creation", drifted.join(", "))
        })
    }

    async fn partially_update(&self) -> Result<()> {
        let Some(unit) = self.unit() else {
            return Ok(());
        };
        let attrs = gen_content_unit_attrs(&self.artifact);
        expect_http_error(
            self.client.patch_file_content(&unit.href, &attrs).await,
            "PATCH on a content unit",
        )?;
        self.assert_unchanged(unit).await
    }

    async fn fully_update(&self) -> Result<()> {
        let Some(unit) = self.unit() else {
            return Ok(());
        };
        let attrs = gen_content_unit_attrs(&self.artifact);
        expect_http_error(
            self.client.put_file_content(&unit.href, &attrs).await,
            "PUT on a content unit",
        )?;
        self.assert_unchanged(unit).await
    }

    async fn assert_unchanged(&self, recorded: &FileContent) -> Result<()> {
        let current = self.client.get_file_content(&recorded.href).await?;
        let drifted = current.drifted_fields(recorded);
        ensure(drifted.is_empty(), || {
            format!(
                "content unit changed after a rejected update: {}",
                drifted.join(", ")
            )
        })
    }

    /// DELETE by href; a later GET on the same href must fail
    async fn delete(&mut self, cleanup: &mut CleanupRegistry) -> Result<()> {
        let Some(href) = self.unit().map(|u| u.href.clone()) else {
            return Ok(());
        };
        self.client.delete_content(&href).await?;
        self.state = UnitState::Deleted;

        let err = expect_http_error(
            self.client.get_file_content(&href).await,
            "GET on a deleted content unit",
        )?;
        // Anything but a 404 may still leave the unit behind for teardown
        if matches!(err, ApiError::NotFound(_)) {
            cleanup.forget(&href);
        }
        Ok(())
    }
}
