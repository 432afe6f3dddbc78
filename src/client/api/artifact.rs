//! Artifact API trait

use async_trait::async_trait;

use crate::client::models::Artifact;
use crate::error::Result;

/// Artifact operations
#[async_trait]
pub trait ArtifactApi: Send + Sync {
    /// Upload bytes as a new artifact (multipart field `file`)
    async fn upload_artifact(&self, file_name: &str, bytes: &[u8]) -> Result<Artifact>;

    /// List every artifact, following pagination
    async fn list_artifacts(&self) -> Result<Vec<Artifact>>;

    async fn delete_artifact(&self, href: &str) -> Result<()>;
}
