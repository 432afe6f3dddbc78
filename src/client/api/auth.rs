//! Authentication API trait

use async_trait::async_trait;

use crate::client::models::JwtToken;
use crate::error::Result;

/// Token issuance for the Pulp API
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange a credential pair for a JWT.
    ///
    /// Fails when the endpoint answers with an error status or the
    /// response carries no `token` field.
    async fn issue_token(&self, username: &str, password: &str) -> Result<JwtToken>;
}
