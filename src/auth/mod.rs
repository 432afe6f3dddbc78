//! Authentication strategies and the randomized selector
//!
//! Every request the client sends carries an `Authorization` header produced
//! by an [`AuthStrategy`]. In random mode the selector picks Basic or JWT
//! uniformly per selection.

use base64::{Engine as _, engine::general_purpose};
use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use reqwest::RequestBuilder;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::client::api::AuthApi;
use crate::config::Config;
use crate::error::Result;

/// Header scheme label the server expects for issued tokens
pub const JWT_SCHEME: &str = "JWT";

/// How the strategy is chosen
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Always HTTP Basic
    Basic,
    /// Always a token from the JWT endpoint
    Jwt,
    /// Uniform random choice per selection
    #[default]
    Random,
}

/// Which strategy variant was selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthKind {
    Basic,
    Jwt,
}

impl std::fmt::Display for AuthKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthKind::Basic => write!(f, "basic"),
            AuthKind::Jwt => write!(f, "jwt"),
        }
    }
}

/// Per-request credentials
#[derive(Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    /// HTTP Basic with the configured credential pair
    Basic { username: String, password: String },
    /// Bearer-style token, sent as `<scheme> <token>`
    Token { scheme: String, token: String },
}

impl AuthStrategy {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        AuthStrategy::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn jwt(token: impl Into<String>) -> Self {
        AuthStrategy::Token {
            scheme: JWT_SCHEME.to_string(),
            token: token.into(),
        }
    }

    pub fn kind(&self) -> AuthKind {
        match self {
            AuthStrategy::Basic { .. } => AuthKind::Basic,
            AuthStrategy::Token { .. } => AuthKind::Jwt,
        }
    }

    /// Value of the `Authorization` header
    pub fn header_value(&self) -> String {
        match self {
            AuthStrategy::Basic { username, password } => {
                let encoded = general_purpose::STANDARD.encode(format!("{username}:{password}"));
                format!("Basic {encoded}")
            }
            AuthStrategy::Token { scheme, token } => format!("{scheme} {token}"),
        }
    }

    /// Inject the `Authorization` header into an outgoing request
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(AUTHORIZATION, self.header_value())
    }
}

impl std::fmt::Debug for AuthStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthStrategy::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            AuthStrategy::Token { scheme, .. } => f
                .debug_struct("Token")
                .field("scheme", scheme)
                .field("token", &"<redacted>")
                .finish(),
        }
    }
}

/// Return a random authentication strategy for `config`.
pub async fn get_auth<A>(config: &Config, issuer: &A) -> Result<AuthStrategy>
where
    A: AuthApi + ?Sized,
{
    let kind = choose_kind(AuthMode::Random, &mut rand::thread_rng());
    build_strategy(config, issuer, kind).await
}

/// Select a strategy according to `mode`, drawing from `rng` when random.
pub async fn select_auth<A, R>(
    config: &Config,
    issuer: &A,
    mode: AuthMode,
    rng: &mut R,
) -> Result<AuthStrategy>
where
    A: AuthApi + ?Sized,
    R: Rng + ?Sized,
{
    let kind = choose_kind(mode, rng);
    build_strategy(config, issuer, kind).await
}

/// Resolve a mode to a concrete variant
pub fn choose_kind<R: Rng + ?Sized>(mode: AuthMode, rng: &mut R) -> AuthKind {
    match mode {
        AuthMode::Basic => AuthKind::Basic,
        AuthMode::Jwt => AuthKind::Jwt,
        AuthMode::Random => *[AuthKind::Basic, AuthKind::Jwt]
            .choose(rng)
            .unwrap_or(&AuthKind::Basic),
    }
}

async fn build_strategy<A>(config: &Config, issuer: &A, kind: AuthKind) -> Result<AuthStrategy>
where
    A: AuthApi + ?Sized,
{
    let creds = &config.auth;
    let strategy = match kind {
        AuthKind::Basic => AuthStrategy::basic(&creds.username, &creds.password),
        AuthKind::Jwt => {
            debug!("Requesting JWT for user {}", creds.username);
            let token = issuer.issue_token(&creds.username, &creds.password).await?;
            AuthStrategy::jwt(token.token)
        }
    };
    info!("Using {} authentication", strategy.kind());
    Ok(strategy)
}
