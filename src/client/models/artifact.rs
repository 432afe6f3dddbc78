//! Artifact models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Uploaded binary content known to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Artifact href
    #[serde(rename = "_href")]
    pub href: String,

    /// Storage path of the file (server specific)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Hex-encoded SHA-256 digest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
