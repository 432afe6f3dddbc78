//! File content API trait

use async_trait::async_trait;

use crate::client::models::{FileContent, NewFileContent};
use crate::error::Result;

/// File content unit operations
///
/// Content units are immutable once created; a conforming server rejects
/// both update methods with an error status.
#[async_trait]
pub trait ContentApi: Send + Sync {
    async fn create_file_content(&self, attrs: &NewFileContent) -> Result<FileContent>;

    async fn get_file_content(&self, href: &str) -> Result<FileContent>;

    /// Partial update via HTTP PATCH
    async fn patch_file_content(&self, href: &str, attrs: &NewFileContent) -> Result<FileContent>;

    /// Full update via HTTP PUT
    async fn put_file_content(&self, href: &str, attrs: &NewFileContent) -> Result<FileContent>;

    async fn delete_content(&self, href: &str) -> Result<()>;
}
