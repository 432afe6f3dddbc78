//! Repository API trait

use async_trait::async_trait;

use crate::client::models::{FileContent, NewRepository, Repository};
use crate::error::Result;

/// Repository operations
#[async_trait]
pub trait RepositoryApi: Send + Sync {
    async fn create_repository(&self, repository: &NewRepository) -> Result<Repository>;

    async fn get_repository(&self, href: &str) -> Result<Repository>;

    async fn delete_repository(&self, href: &str) -> Result<()>;

    /// Content units of the repository's latest version.
    ///
    /// Empty when the repository has no version yet.
    async fn list_repository_content(&self, repository: &Repository) -> Result<Vec<FileContent>>;
}
