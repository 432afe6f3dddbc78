//! Teardown registry for server objects created by a scenario
//!
//! Async work cannot run in `Drop`, so scenarios call
//! [`CleanupRegistry::run`] explicitly after their last step regardless of
//! how the steps went.

use log::{debug, warn};

use crate::client::PulpApi;
use crate::error::{ApiError, Error, Result};

/// Kind of server object to delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Artifact,
    Content,
    Remote,
    Repository,
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Resource::Artifact => "artifact",
            Resource::Content => "content unit",
            Resource::Remote => "remote",
            Resource::Repository => "repository",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Cleanup {
    resource: Resource,
    href: String,
}

/// Deletions to run at teardown, newest first
#[derive(Debug, Default)]
pub struct CleanupRegistry {
    entries: Vec<Cleanup>,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `href` for deletion at teardown
    pub fn register(&mut self, resource: Resource, href: impl Into<String>) {
        let href = href.into();
        debug!("Registered {} {} for cleanup", resource, href);
        self.entries.push(Cleanup { resource, href });
    }

    /// Drop a registration because the scenario already removed the object
    pub fn forget(&mut self, href: &str) {
        self.entries.retain(|c| c.href != href);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Delete every registered object in reverse registration order.
    ///
    /// All deletions are attempted; the failures are returned as messages.
    /// An object that is already gone counts as cleaned up.
    pub async fn run<C>(&mut self, client: &C) -> Vec<String>
    where
        C: PulpApi + ?Sized,
    {
        let mut errors = Vec::new();
        while let Some(entry) = self.entries.pop() {
            match delete(client, &entry).await {
                Ok(()) => debug!("Cleaned up {} {}", entry.resource, entry.href),
                Err(Error::Api(ApiError::NotFound(_))) => {
                    debug!("{} {} was already gone", entry.resource, entry.href)
                }
                Err(err) => {
                    warn!("Failed to clean up {} {}: {}", entry.resource, entry.href, err);
                    errors.push(format!("{} {}: {}", entry.resource, entry.href, err));
                }
            }
        }
        errors
    }
}

async fn delete<C>(client: &C, entry: &Cleanup) -> Result<()>
where
    C: PulpApi + ?Sized,
{
    match entry.resource {
        Resource::Artifact => client.delete_artifact(&entry.href).await,
        Resource::Content => client.delete_content(&entry.href).await,
        Resource::Remote => client.delete_remote(&entry.href).await,
        Resource::Repository => client.delete_repository(&entry.href).await,
    }
}
