//! Pulp API client implementation

use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::debug;
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::api::{ArtifactApi, AuthApi, ContentApi, RemoteApi, RepositoryApi};
use super::models::{
    Artifact, FileContent, FileRemote, JwtToken, NewFileContent, NewRemote, NewRepository, Page,
    Repository, SpawnedTasks, Task, TaskState,
};
use super::paths::{ARTIFACTS_PATH, FILE_CONTENT_PATH, FILE_REMOTE_PATH, JWT_PATH, REPO_PATH};
use crate::auth::AuthStrategy;
use crate::config::Config;
use crate::error::{ApiError, ConfigError, Result};

/// Pulp API client
///
/// Sends one request at a time. Error statuses are mapped to [`ApiError`]
/// variants and 202 responses are followed until their tasks finish.
pub struct PulpClient {
    http: HttpClient,
    base_url: Url,
    auth: Option<AuthStrategy>,
    task_poll_interval: Duration,
    task_timeout: Duration,
}

impl PulpClient {
    /// Create an unauthenticated client for the configured server
    pub fn new(config: &Config) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            auth: None,
            task_poll_interval: config.task_poll_interval(),
            task_timeout: config.task_timeout(),
        })
    }

    /// Attach the strategy applied to every subsequent request
    pub fn with_auth(mut self, auth: AuthStrategy) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn auth(&self) -> Option<&AuthStrategy> {
        self.auth.as_ref()
    }

    /// Resolve an href (absolute path or full URL) against the base URL
    pub fn url_for(&self, href: &str) -> Result<Url> {
        self.base_url
            .join(href)
            .map_err(|e| ApiError::InvalidResponse(format!("Invalid href '{}': {}", href, e)).into())
    }

    /// Build a request with the auth header applied
    fn request(&self, method: Method, href: &str) -> Result<RequestBuilder> {
        let url = self.url_for(href)?;
        debug!("{} {}", method, url);
        let request = self.http.request(method, url);
        Ok(match &self.auth {
            Some(auth) => auth.apply(request),
            None => request,
        })
    }

    /// Send a request, mapping error statuses to [`ApiError`]
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(ApiError::from)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!("Request failed with {}: {}", status, body);
        Err(ApiError::from_status(status, body).into())
    }

    /// Decode a JSON body, keeping the raw text in the error
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to read response: {}", e)))?;

        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "Failed to parse response: {}. Body was: {}",
                e, text
            ))
            .into()
        })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, href: &str) -> Result<T> {
        let response = self.execute(self.request(Method::GET, href)?).await?;
        Self::decode(response).await
    }

    /// Send a JSON body and decode the JSON answer
    pub async fn send_json<B, T>(&self, method: Method, href: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, href)?.json(body);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    /// DELETE an href, waiting for any task the server spawns
    pub async fn delete(&self, href: &str) -> Result<()> {
        let response = self.execute(self.request(Method::DELETE, href)?).await?;
        self.finish(response).await
    }

    /// GET every item of a paginated list endpoint
    pub async fn get_all<T: DeserializeOwned>(&self, href: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(href.to_string());
        while let Some(page_href) = next {
            let page: Page<T> = self.get_json(&page_href).await?;
            items.extend(page.results);
            next = page.next;
        }
        Ok(items)
    }

    /// Wait for the tasks behind a 202 response; other statuses need nothing
    async fn finish(&self, response: Response) -> Result<()> {
        if response.status() != StatusCode::ACCEPTED {
            return Ok(());
        }
        let spawned: SpawnedTasks = Self::decode(response).await?;
        for task in spawned.into_vec() {
            self.wait_for_task(&task.href).await?;
        }
        Ok(())
    }

    /// Poll a task until it finishes. Any end state other than completed is an error.
    pub async fn wait_for_task(&self, href: &str) -> Result<Task> {
        let deadline = Instant::now() + self.task_timeout;
        loop {
            let task: Task = self.get_json(href).await?;
            debug!("Task {} is {}", href, task.state.as_str());

            match task.state {
                TaskState::Completed => return Ok(task),
                state if state.is_finished() => {
                    let detail = task
                        .error
                        .as_ref()
                        .map(Value::to_string)
                        .unwrap_or_else(|| "no error detail".to_string());
                    return Err(ApiError::TaskFailed {
                        href: href.to_string(),
                        state: state.as_str().to_string(),
                        detail,
                    }
                    .into());
                }
                _ => {}
            }

            if Instant::now() >= deadline {
                return Err(ApiError::TaskTimeout(href.to_string(), self.task_timeout).into());
            }
            tokio::time::sleep(self.task_poll_interval).await;
        }
    }
}

#[async_trait]
impl AuthApi for PulpClient {
    async fn issue_token(&self, username: &str, password: &str) -> Result<JwtToken> {
        let url = self.url_for(JWT_PATH)?;
        debug!("POST {}", url);

        // The token endpoint authenticates through the body, not the header
        let request = self.http.post(url).json(&json!({
            "username": username,
            "password": password,
        }));
        let response = self.execute(request).await?;
        let body: Value = Self::decode(response).await?;

        let token = body
            .get("token")
            .and_then(Value::as_str)
            .ok_or(ApiError::InvalidToken)?;

        Ok(JwtToken {
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl ArtifactApi for PulpClient {
    async fn upload_artifact(&self, file_name: &str, bytes: &[u8]) -> Result<Artifact> {
        let part = Part::bytes(bytes.to_vec()).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let request = self.request(Method::POST, ARTIFACTS_PATH)?.multipart(form);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    async fn list_artifacts(&self) -> Result<Vec<Artifact>> {
        self.get_all(ARTIFACTS_PATH).await
    }

    async fn delete_artifact(&self, href: &str) -> Result<()> {
        self.delete(href).await
    }
}

#[async_trait]
impl ContentApi for PulpClient {
    async fn create_file_content(&self, attrs: &NewFileContent) -> Result<FileContent> {
        self.send_json(Method::POST, FILE_CONTENT_PATH, attrs).await
    }

    async fn get_file_content(&self, href: &str) -> Result<FileContent> {
        self.get_json(href).await
    }

    async fn patch_file_content(&self, href: &str, attrs: &NewFileContent) -> Result<FileContent> {
        self.send_json(Method::PATCH, href, attrs).await
    }

    async fn put_file_content(&self, href: &str, attrs: &NewFileContent) -> Result<FileContent> {
        self.send_json(Method::PUT, href, attrs).await
    }

    async fn delete_content(&self, href: &str) -> Result<()> {
        self.delete(href).await
    }
}

#[async_trait]
impl RemoteApi for PulpClient {
    async fn create_file_remote(&self, remote: &NewRemote) -> Result<FileRemote> {
        self.send_json(Method::POST, FILE_REMOTE_PATH, remote).await
    }

    async fn sync(&self, remote: &FileRemote, repository: &Repository) -> Result<()> {
        let request = self
            .request(Method::POST, &remote.sync_href())?
            .json(&json!({ "repository": repository.href }));
        let response = self.execute(request).await?;
        self.finish(response).await
    }

    async fn delete_remote(&self, href: &str) -> Result<()> {
        self.delete(href).await
    }
}

#[async_trait]
impl RepositoryApi for PulpClient {
    async fn create_repository(&self, repository: &NewRepository) -> Result<Repository> {
        self.send_json(Method::POST, REPO_PATH, repository).await
    }

    async fn get_repository(&self, href: &str) -> Result<Repository> {
        self.get_json(href).await
    }

    async fn delete_repository(&self, href: &str) -> Result<()> {
        self.delete(href).await
    }

    async fn list_repository_content(&self, repository: &Repository) -> Result<Vec<FileContent>> {
        match repository.latest_content_href() {
            Some(href) => self.get_all(&href).await,
            None => Ok(Vec::new()),
        }
    }
}
