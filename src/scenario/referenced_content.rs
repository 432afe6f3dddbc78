//! Deletion guard for content referenced by a repository version
//!
//! Sync a repository from the file feed, then try to delete one of the
//! units in its latest version. The server must refuse and the version
//! must keep all of its content.

use log::info;
use rand::seq::SliceRandom;

use super::cleanup::{CleanupRegistry, Resource};
use super::{ScenarioKind, ScenarioReport, ensure, expect_http_error};
use crate::client::PulpApi;
use crate::client::models::{FileContent, FileRemote, Repository};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fixtures::{gen_remote, gen_repo};

/// Steps in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStep {
    CreateRemote,
    CreateRepository,
    Sync,
    DeleteReferenced,
}

impl GuardStep {
    pub const ALL: [GuardStep; 4] = [
        GuardStep::CreateRemote,
        GuardStep::CreateRepository,
        GuardStep::Sync,
        GuardStep::DeleteReferenced,
    ];

    pub const NAMES: &'static [&'static str] = &[
        "create_remote",
        "create_repository",
        "sync_repository",
        "delete_referenced_content",
    ];

    pub fn name(self) -> &'static str {
        match self {
            GuardStep::CreateRemote => Self::NAMES[0],
            GuardStep::CreateRepository => Self::NAMES[1],
            GuardStep::Sync => Self::NAMES[2],
            GuardStep::DeleteReferenced => Self::NAMES[3],
        }
    }
}

#[derive(Default)]
struct Guard {
    remote: Option<FileRemote>,
    repository: Option<Repository>,
    /// Units of the synced version, empty until sync succeeds
    content: Vec<FileContent>,
}

impl Guard {
    /// Why `step` cannot run yet, if it cannot
    fn missing_precondition(&self, step: GuardStep) -> Option<&'static str> {
        match step {
            GuardStep::CreateRemote | GuardStep::CreateRepository => None,
            GuardStep::Sync if self.remote.is_none() => Some("remote was never created"),
            GuardStep::Sync if self.repository.is_none() => Some("repository was never created"),
            GuardStep::Sync => None,
            GuardStep::DeleteReferenced if self.content.is_empty() => {
                Some("repository holds no synced content")
            }
            GuardStep::DeleteReferenced => None,
        }
    }
}

/// Run the referenced-content deletion guard scenario.
pub async fn run<C>(client: &C, config: &Config) -> ScenarioReport
where
    C: PulpApi + ?Sized,
{
    let mut report = ScenarioReport::new(ScenarioKind::ReferencedContent);
    let mut cleanup = CleanupRegistry::new();
    let mut guard = Guard::default();

    for step in GuardStep::ALL {
        if let Some(reason) = guard.missing_precondition(step) {
            report.skip(step.name(), reason);
            continue;
        }
        let result = match step {
            GuardStep::CreateRemote => create_remote(client, config, &mut guard, &mut cleanup).await,
            GuardStep::CreateRepository => create_repository(client, &mut guard, &mut cleanup).await,
            GuardStep::Sync => sync(client, &mut guard).await,
            GuardStep::DeleteReferenced => delete_referenced(client, &guard).await,
        };
        report.record(step.name(), result);
    }

    report.cleanup_errors = cleanup.run(client).await;
    report
}

async fn create_remote<C>(
    client: &C,
    config: &Config,
    guard: &mut Guard,
    cleanup: &mut CleanupRegistry,
) -> Result<()>
where
    C: PulpApi + ?Sized,
{
    let body = gen_remote(&config.file_manifest_url()?);
    let remote = client.create_file_remote(&body).await?;
    cleanup.register(Resource::Remote, &remote.href);
    guard.remote = Some(remote);
    Ok(())
}

async fn create_repository<C>(
    client: &C,
    guard: &mut Guard,
    cleanup: &mut CleanupRegistry,
) -> Result<()>
where
    C: PulpApi + ?Sized,
{
    let repository = client.create_repository(&gen_repo()).await?;
    cleanup.register(Resource::Repository, &repository.href);
    guard.repository = Some(repository);
    Ok(())
}

/// Sync, re-read the repository and capture the new version's content
async fn sync<C>(client: &C, guard: &mut Guard) -> Result<()>
where
    C: PulpApi + ?Sized,
{
    let (Some(remote), Some(repository)) = (&guard.remote, &guard.repository) else {
        return Err(Error::Other("sync preconditions missing".to_string()));
    };

    client.sync(remote, repository).await?;
    let repository = client.get_repository(&repository.href).await?;
    ensure(repository.latest_version_href.is_some(), || {
        format!("sync of {} produced no repository version", repository.href)
    })?;

    let content = client.list_repository_content(&repository).await?;
    ensure(!content.is_empty(), || {
        format!("latest version of {} has no content", repository.href)
    })?;

    info!("Synced {} content unit(s) into {}", content.len(), repository.href);
    guard.repository = Some(repository);
    guard.content = content;
    Ok(())
}

/// Deleting any referenced unit must fail and leave the count unchanged
async fn delete_referenced<C>(client: &C, guard: &Guard) -> Result<()>
where
    C: PulpApi + ?Sized,
{
    let Some(repository) = &guard.repository else {
        return Err(Error::Other("repository missing".to_string()));
    };
    let target = guard
        .content
        .choose(&mut rand::thread_rng())
        .cloned()
        .ok_or_else(|| Error::Other("no content to delete".to_string()))?;

    expect_http_error(
        client.delete_content(&target.href).await,
        "DELETE of content referenced by a repository version",
    )?;

    let after = client.list_repository_content(repository).await?;
    ensure(after.len() == guard.content.len(), || {
        format!(
            "repository content count changed from {} to {}",
            guard.content.len(),
            after.len()
        )
    })
}
