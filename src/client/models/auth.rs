//! Authentication models

use serde::{Deserialize, Serialize};

/// Token issued by the JWT endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtToken {
    /// The JWT token string
    pub token: String,
}
