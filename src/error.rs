//! Error types for pulpcheck

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for pulpcheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A scenario check did not hold
    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("{0} scenario step(s) failed")]
    ScenarioFailed(usize),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl Error {
    /// The API error behind this error, if any
    #[cfg(test)]
    pub fn as_api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// API-related errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed. Check the credentials in your pulpcheck config.")]
    Unauthorized,

    #[error("Access denied. You don't have permission to access this resource.")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Token endpoint response did not contain a token")]
    InvalidToken,

    #[error("Task {href} ended in state '{state}': {detail}")]
    TaskFailed {
        href: String,
        state: String,
        detail: String,
    },

    #[error("Task {0} did not finish within {1:?}")]
    TaskTimeout(String, Duration),
}

impl ApiError {
    /// Build the error for a non-success HTTP status and its body.
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
            StatusCode::FORBIDDEN => ApiError::Forbidden,
            StatusCode::NOT_FOUND => ApiError::NotFound(body),
            StatusCode::METHOD_NOT_ALLOWED => ApiError::MethodNotAllowed(body),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::BadRequest(body)
            }
            StatusCode::CONFLICT => ApiError::Conflict(body),
            status if status.is_server_error() => ApiError::ServerError(body),
            status => ApiError::UnexpectedStatus { status, body },
        }
    }

    /// HTTP status the server answered with, when the error came from one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ApiError::Forbidden => Some(StatusCode::FORBIDDEN),
            ApiError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ApiError::MethodNotAllowed(_) => Some(StatusCode::METHOD_NOT_ALLOWED),
            ApiError::BadRequest(_) => Some(StatusCode::BAD_REQUEST),
            ApiError::Conflict(_) => Some(StatusCode::CONFLICT),
            ApiError::ServerError(_) => Some(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server rejected the request with an error status.
    ///
    /// Transport, decoding and task failures are not HTTP errors.
    pub fn is_http_error(&self) -> bool {
        self.status()
            .is_some_and(|s| s.is_client_error() || s.is_server_error())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found at {0}. Create it or pass --config.")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Credentials not configured. Set auth.username and auth.password.")]
    MissingCredentials,

    #[error("Unrecognized API version '{0}'")]
    InvalidVersion(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
