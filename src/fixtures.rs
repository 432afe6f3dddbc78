//! Fixture data: downloaded files and generated request bodies
//!
//! Names and relative paths are random UUIDs so repeated runs against the
//! same server never collide.

use log::debug;
use reqwest::Url;
use sha2::{Digest, Sha256};

use crate::client::models::{Artifact, NewFileContent, NewRemote, NewRepository};
use crate::config::Config;
use crate::error::{ApiError, Result};

/// A file downloaded from the fixture feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureFile {
    /// Last path segment of the source URL
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FixtureFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Hex-encoded SHA-256 of the contents
    pub fn sha256(&self) -> String {
        format!("{:x}", Sha256::digest(&self.bytes))
    }
}

/// Random UUID4 string
pub fn uuid4() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Content unit attributes pointing at `artifact` with a random relative path
pub fn gen_content_unit_attrs(artifact: &Artifact) -> NewFileContent {
    NewFileContent {
        artifact: artifact.href.clone(),
        relative_path: uuid4(),
    }
}

/// Remote with a random name syncing from `feed_url`
pub fn gen_remote(feed_url: &Url) -> NewRemote {
    NewRemote {
        name: uuid4(),
        feed_url: feed_url.to_string(),
    }
}

/// Repository with a random name
pub fn gen_repo() -> NewRepository {
    NewRepository { name: uuid4() }
}

/// Download a file without authentication.
pub async fn http_get(config: &Config, url: &Url) -> Result<FixtureFile> {
    debug!("Downloading fixture {}", url);
    let http = reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let response = http
        .get(url.clone())
        .send()
        .await
        .map_err(ApiError::from)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::from_status(status, body).into());
    }

    let bytes = response.bytes().await.map_err(ApiError::from)?;
    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .unwrap_or("fixture")
        .to_string();

    Ok(FixtureFile::new(name, bytes.to_vec()))
}
