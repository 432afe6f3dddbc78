//! Remote and sync API trait

use async_trait::async_trait;

use crate::client::models::{FileRemote, NewRemote, Repository};
use crate::error::Result;

/// Remote operations
#[async_trait]
pub trait RemoteApi: Send + Sync {
    async fn create_file_remote(&self, remote: &NewRemote) -> Result<FileRemote>;

    /// Sync `repository` from `remote` and wait for the spawned task(s).
    ///
    /// On success the repository has a new latest version.
    async fn sync(&self, remote: &FileRemote, repository: &Repository) -> Result<()>;

    async fn delete_remote(&self, href: &str) -> Result<()>;
}
