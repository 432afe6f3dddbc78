//! Mock Pulp API client for testing
//!
//! Provides an in-memory implementation of the API traits for unit testing
//! without making real API calls. The mock keeps the server rules the
//! scenarios exercise: content units reject updates, referenced content and
//! artifacts cannot be deleted, and deleted resources answer 404.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use super::api::{ArtifactApi, AuthApi, ContentApi, RemoteApi, RepositoryApi};
use super::models::{
    Artifact, FileContent, FileRemote, JwtToken, NewFileContent, NewRemote, NewRepository,
    Repository,
};
use super::paths::{ARTIFACTS_PATH, FILE_CONTENT_PATH, FILE_REMOTE_PATH, REPO_PATH};
use crate::error::{ApiError, Result};

/// Mock API client for testing.
///
/// Configure the fake server via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockPulpClient::new()
///     .with_token("abc")
///     .with_feed(["1.iso", "2.iso", "3.iso"]);
///
/// let token = mock.issue_token("admin", "admin").await?;
/// assert_eq!(token.token, "abc");
/// ```
#[derive(Default)]
pub struct MockPulpClient {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Token handed out by issue_token; None answers 401
    token: Option<String>,
    /// Error to return (if any) - consumed on first use
    error: Option<ApiError>,
    artifacts: BTreeMap<String, Artifact>,
    content: BTreeMap<String, FileContent>,
    remotes: BTreeMap<String, FileRemote>,
    repositories: BTreeMap<String, Repository>,
    /// Version href -> content hrefs in that version
    versions: HashMap<String, Vec<String>>,
    /// Relative paths a sync pulls in
    feed: Vec<String>,
    next_id: u64,
    /// Misbehave: apply PATCH/PUT to content units
    accept_content_updates: bool,
    /// Misbehave: delete content even when a version references it
    allow_referenced_delete: bool,
    /// Misbehave: refuse a referenced delete but drop the unit from its versions
    drop_refused_content: bool,
    /// Misbehave: answer the next content DELETE without deleting
    ignore_next_content_delete: bool,
    /// Misbehave: content GETs report a different relative path
    alter_content_reads: bool,
    calls: CallCounts,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub issue_token: usize,
    pub upload_artifact: usize,
    pub list_artifacts: usize,
    pub delete_artifact: usize,
    pub create_file_content: usize,
    pub get_file_content: usize,
    pub patch_file_content: usize,
    pub put_file_content: usize,
    pub delete_content: usize,
    pub create_file_remote: usize,
    pub sync: usize,
    pub delete_remote: usize,
    pub create_repository: usize,
    pub get_repository: usize,
    pub delete_repository: usize,
    pub list_repository_content: usize,
}

impl MockState {
    fn take_error(&mut self) -> Result<()> {
        match self.error.take() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    fn next_href(&mut self, collection: &str) -> String {
        self.next_id += 1;
        format!("{}{}/", collection, self.next_id)
    }

    fn add_artifact(&mut self, bytes: &[u8]) -> Result<Artifact> {
        let sha256 = format!("{:x}", Sha256::digest(bytes));
        if self
            .artifacts
            .values()
            .any(|a| a.sha256.as_deref() == Some(sha256.as_str()))
        {
            return Err(ApiError::BadRequest(format!(
                "{{\"non_field_errors\": [\"sha256 checksum must be unique: {}\"]}}",
                sha256
            ))
            .into());
        }

        let href = self.next_href(ARTIFACTS_PATH);
        let artifact = Artifact {
            href: href.clone(),
            file: Some(format!("artifact/{}/{}", &sha256[..2], &sha256[2..])),
            size: Some(bytes.len() as u64),
            sha256: Some(sha256),
            extra: Map::new(),
        };
        self.artifacts.insert(href, artifact.clone());
        Ok(artifact)
    }

    fn add_content(&mut self, attrs: &NewFileContent) -> Result<FileContent> {
        if !self.artifacts.contains_key(&attrs.artifact) {
            return Err(ApiError::BadRequest(format!(
                "{{\"artifact\": [\"Invalid hyperlink - Object does not exist: {}\"]}}",
                attrs.artifact
            ))
            .into());
        }

        let href = self.next_href(FILE_CONTENT_PATH);
        let mut extra = Map::new();
        extra.insert("_type".to_string(), Value::from("file"));
        let unit = FileContent {
            href: href.clone(),
            artifact: attrs.artifact.clone(),
            relative_path: attrs.relative_path.clone(),
            extra,
        };
        self.content.insert(href, unit.clone());
        Ok(unit)
    }

    fn is_referenced(&self, content_href: &str) -> bool {
        self.versions
            .values()
            .any(|hrefs| hrefs.iter().any(|h| h == content_href))
    }

    fn update_content(
        &mut self,
        method: &str,
        href: &str,
        attrs: &NewFileContent,
    ) -> Result<FileContent> {
        if !self.accept_content_updates {
            return Err(ApiError::MethodNotAllowed(format!(
                "{{\"detail\": \"Method \\\"{}\\\" not allowed.\"}}",
                method
            ))
            .into());
        }
        let unit = self
            .content
            .get_mut(href)
            .ok_or_else(|| ApiError::NotFound(href.to_string()))?;
        unit.artifact = attrs.artifact.clone();
        unit.relative_path = attrs.relative_path.clone();
        Ok(unit.clone())
    }
}

impl MockPulpClient {
    /// Create a new mock with an empty server
    pub fn new() -> Self {
        Self::default()
    }

    /// Token returned by the JWT endpoint
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.state.try_lock().expect("unshared mock").token = Some(token.into());
        self
    }

    /// Fail the next call with `error`
    pub fn with_error(self, error: ApiError) -> Self {
        self.state.try_lock().expect("unshared mock").error = Some(error);
        self
    }

    /// Relative paths a sync adds to a repository
    pub fn with_feed<I, S>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.try_lock().expect("unshared mock").feed =
            paths.into_iter().map(Into::into).collect();
        self
    }

    /// Seed the server with artifacts holding `contents`
    pub fn with_artifacts<I, B>(self, contents: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        {
            let mut state = self.state.try_lock().expect("unshared mock");
            for bytes in contents {
                state.add_artifact(bytes.as_ref()).expect("unique seed artifacts");
            }
        }
        self
    }

    /// Apply content updates instead of rejecting them
    pub fn accepting_content_updates(self) -> Self {
        self.state.try_lock().expect("unshared mock").accept_content_updates = true;
        self
    }

    /// Delete content even when a repository version references it
    pub fn allowing_referenced_deletes(self) -> Self {
        self.state.try_lock().expect("unshared mock").allow_referenced_delete = true;
        self
    }

    /// Refuse referenced deletes while still removing the unit from versions
    pub fn dropping_refused_content(self) -> Self {
        self.state.try_lock().expect("unshared mock").drop_refused_content = true;
        self
    }

    /// Accept the next content delete but keep the unit
    pub fn ignoring_next_content_delete(self) -> Self {
        self.state.try_lock().expect("unshared mock").ignore_next_content_delete = true;
        self
    }

    /// Report a different relative path on every content read
    pub fn altering_content_reads(self) -> Self {
        self.state.try_lock().expect("unshared mock").alter_content_reads = true;
        self
    }

    /// Inject an error for the next call on an already shared mock
    pub async fn fail_next(&self, error: ApiError) {
        self.state.lock().await.error = Some(error);
    }

    pub async fn call_counts(&self) -> CallCounts {
        self.state.lock().await.calls.clone()
    }

    pub async fn artifact_count(&self) -> usize {
        self.state.lock().await.artifacts.len()
    }

    pub async fn content_count(&self) -> usize {
        self.state.lock().await.content.len()
    }

    pub async fn remote_count(&self) -> usize {
        self.state.lock().await.remotes.len()
    }

    pub async fn repository_count(&self) -> usize {
        self.state.lock().await.repositories.len()
    }
}

#[async_trait]
impl AuthApi for MockPulpClient {
    async fn issue_token(&self, _username: &str, _password: &str) -> Result<JwtToken> {
        let mut state = self.state.lock().await;
        state.calls.issue_token += 1;
        state.take_error()?;
        let token = state.token.clone().ok_or(ApiError::Unauthorized)?;
        Ok(JwtToken { token })
    }
}

#[async_trait]
impl ArtifactApi for MockPulpClient {
    async fn upload_artifact(&self, _file_name: &str, bytes: &[u8]) -> Result<Artifact> {
        let mut state = self.state.lock().await;
        state.calls.upload_artifact += 1;
        state.take_error()?;
        state.add_artifact(bytes)
    }

    async fn list_artifacts(&self) -> Result<Vec<Artifact>> {
        let mut state = self.state.lock().await;
        state.calls.list_artifacts += 1;
        state.take_error()?;
        Ok(state.artifacts.values().cloned().collect())
    }

    async fn delete_artifact(&self, href: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.calls.delete_artifact += 1;
        state.take_error()?;
        if !state.artifacts.contains_key(href) {
            return Err(ApiError::NotFound(href.to_string()).into());
        }
        if state.content.values().any(|c| c.artifact == href) {
            return Err(ApiError::Conflict(format!("artifact {} is in use", href)).into());
        }
        state.artifacts.remove(href);
        Ok(())
    }
}

#[async_trait]
impl ContentApi for MockPulpClient {
    async fn create_file_content(&self, attrs: &NewFileContent) -> Result<FileContent> {
        let mut state = self.state.lock().await;
        state.calls.create_file_content += 1;
        state.take_error()?;
        state.add_content(attrs)
    }

    async fn get_file_content(&self, href: &str) -> Result<FileContent> {
        let mut state = self.state.lock().await;
        state.calls.get_file_content += 1;
        state.take_error()?;
        let mut unit = state
            .content
            .get(href)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(href.to_string()))?;
        if state.alter_content_reads {
            unit.relative_path.push_str(".altered");
        }
        Ok(unit)
    }

    async fn patch_file_content(&self, href: &str, attrs: &NewFileContent) -> Result<FileContent> {
        let mut state = self.state.lock().await;
        state.calls.patch_file_content += 1;
        state.take_error()?;
        state.update_content("PATCH", href, attrs)
    }

    async fn put_file_content(&self, href: &str, attrs: &NewFileContent) -> Result<FileContent> {
        let mut state = self.state.lock().await;
        state.calls.put_file_content += 1;
        state.take_error()?;
        state.update_content("PUT", href, attrs)
    }

    async fn delete_content(&self, href: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.calls.delete_content += 1;
        state.take_error()?;
        if !state.content.contains_key(href) {
            return Err(ApiError::NotFound(href.to_string()).into());
        }
        if std::mem::take(&mut state.ignore_next_content_delete) {
            return Ok(());
        }
        if state.is_referenced(href) && !state.allow_referenced_delete {
            if state.drop_refused_content {
                for hrefs in state.versions.values_mut() {
                    hrefs.retain(|h| h != href);
                }
            }
            return Err(ApiError::Conflict(format!(
                "content {} is referenced by a repository version",
                href
            ))
            .into());
        }
        state.content.remove(href);
        for hrefs in state.versions.values_mut() {
            hrefs.retain(|h| h != href);
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteApi for MockPulpClient {
    async fn create_file_remote(&self, remote: &NewRemote) -> Result<FileRemote> {
        let mut state = self.state.lock().await;
        state.calls.create_file_remote += 1;
        state.take_error()?;
        let href = state.next_href(FILE_REMOTE_PATH);
        let created = FileRemote {
            href: href.clone(),
            name: remote.name.clone(),
            feed_url: Some(remote.feed_url.clone()),
            extra: Map::new(),
        };
        state.remotes.insert(href, created.clone());
        Ok(created)
    }

    async fn sync(&self, remote: &FileRemote, repository: &Repository) -> Result<()> {
        let mut state = self.state.lock().await;
        state.calls.sync += 1;
        state.take_error()?;
        if !state.remotes.contains_key(&remote.href) {
            return Err(ApiError::NotFound(remote.href.clone()).into());
        }
        if !state.repositories.contains_key(&repository.href) {
            return Err(ApiError::BadRequest(repository.href.clone()).into());
        }

        let mut hrefs = Vec::new();
        for path in state.feed.clone() {
            let artifact = state.add_artifact(format!("{}:{}", repository.href, path).as_bytes())?;
            let unit = state.add_content(&NewFileContent {
                artifact: artifact.href,
                relative_path: path,
            })?;
            hrefs.push(unit.href);
        }

        let version_number = state
            .versions
            .keys()
            .filter(|v| v.starts_with(&repository.href))
            .count()
            + 1;
        let version_href = format!("{}versions/{}/", repository.href, version_number);
        state.versions.insert(version_href.clone(), hrefs);
        if let Some(repo) = state.repositories.get_mut(&repository.href) {
            repo.latest_version_href = Some(version_href);
        }
        Ok(())
    }

    async fn delete_remote(&self, href: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.calls.delete_remote += 1;
        state.take_error()?;
        state
            .remotes
            .remove(href)
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound(href.to_string()).into())
    }
}

#[async_trait]
impl RepositoryApi for MockPulpClient {
    async fn create_repository(&self, repository: &NewRepository) -> Result<Repository> {
        let mut state = self.state.lock().await;
        state.calls.create_repository += 1;
        state.take_error()?;
        let href = state.next_href(REPO_PATH);
        let created = Repository {
            href: href.clone(),
            name: repository.name.clone(),
            latest_version_href: None,
            versions_href: Some(format!("{}versions/", href)),
            extra: Map::new(),
        };
        state.repositories.insert(href, created.clone());
        Ok(created)
    }

    async fn get_repository(&self, href: &str) -> Result<Repository> {
        let mut state = self.state.lock().await;
        state.calls.get_repository += 1;
        state.take_error()?;
        state
            .repositories
            .get(href)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(href.to_string()).into())
    }

    async fn delete_repository(&self, href: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.calls.delete_repository += 1;
        state.take_error()?;
        if state.repositories.remove(href).is_none() {
            return Err(ApiError::NotFound(href.to_string()).into());
        }
        state.versions.retain(|version, _| !version.starts_with(href));
        Ok(())
    }

    async fn list_repository_content(&self, repository: &Repository) -> Result<Vec<FileContent>> {
        let mut state = self.state.lock().await;
        state.calls.list_repository_content += 1;
        state.take_error()?;
        let Some(version) = repository.latest_version_href.as_ref() else {
            return Ok(Vec::new());
        };
        let hrefs = state.versions.get(version).cloned().unwrap_or_default();
        Ok(hrefs
            .iter()
            .filter_map(|h| state.content.get(h).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::gen_content_unit_attrs;
    use crate::error::Error;

    #[tokio::test]
    async fn test_error_consumed_on_first_use() {
        let mock = MockPulpClient::new().with_error(ApiError::Forbidden);
        assert!(mock.list_artifacts().await.is_err());
        assert!(mock.list_artifacts().await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_artifact_rejected() {
        let mock = MockPulpClient::new();
        mock.upload_artifact("a", b"same").await.unwrap();
        let err = mock.upload_artifact("b", b"same").await.unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_content_requires_existing_artifact() {
        let mock = MockPulpClient::new();
        let err = mock
            .create_file_content(&NewFileContent {
                artifact: "/pulp/api/v3/artifacts/99/".to_string(),
                relative_path: "missing".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_content_updates_rejected() {
        let mock = MockPulpClient::new();
        let artifact = mock.upload_artifact("a", b"x").await.unwrap();
        let unit = mock
            .create_file_content(&gen_content_unit_attrs(&artifact))
            .await
            .unwrap();

        let patch = mock
            .patch_file_content(&unit.href, &gen_content_unit_attrs(&artifact))
            .await
            .unwrap_err();
        assert!(matches!(patch, Error::Api(ApiError::MethodNotAllowed(_))));
        assert_eq!(mock.get_file_content(&unit.href).await.unwrap(), unit);
    }

    #[tokio::test]
    async fn test_sync_creates_version_with_feed_content() {
        let mock = MockPulpClient::new().with_feed(["1.iso", "2.iso"]);
        let remote = mock
            .create_file_remote(&NewRemote {
                name: "r".to_string(),
                feed_url: "http://feed/PULP_MANIFEST".to_string(),
            })
            .await
            .unwrap();
        let repo = mock
            .create_repository(&NewRepository {
                name: "repo".to_string(),
            })
            .await
            .unwrap();

        mock.sync(&remote, &repo).await.unwrap();
        let repo = mock.get_repository(&repo.href).await.unwrap();
        assert!(repo.latest_version_href.is_some());
        assert_eq!(mock.list_repository_content(&repo).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_deleting_repository_releases_content() {
        let mock = MockPulpClient::new().with_feed(["1.iso"]);
        let remote = mock
            .create_file_remote(&NewRemote {
                name: "r".to_string(),
                feed_url: "http://feed/PULP_MANIFEST".to_string(),
            })
            .await
            .unwrap();
        let repo = mock
            .create_repository(&NewRepository {
                name: "repo".to_string(),
            })
            .await
            .unwrap();
        mock.sync(&remote, &repo).await.unwrap();
        let repo = mock.get_repository(&repo.href).await.unwrap();
        let unit = mock.list_repository_content(&repo).await.unwrap().remove(0);

        assert!(mock.delete_content(&unit.href).await.is_err());
        mock.delete_repository(&repo.href).await.unwrap();
        mock.delete_content(&unit.href).await.unwrap();
    }
}
