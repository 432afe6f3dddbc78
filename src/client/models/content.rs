//! File content unit models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attributes posted to create a file content unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFileContent {
    /// Href of the artifact holding the bytes
    pub artifact: String,

    /// Path of the file inside a repository
    pub relative_path: String,
}

/// File content unit as stored by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileContent {
    /// Content unit href
    #[serde(rename = "_href")]
    pub href: String,

    /// Href of the backing artifact
    pub artifact: String,

    /// Path of the file inside a repository
    pub relative_path: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileContent {
    /// Names of the posted attributes the server did not echo back unchanged.
    pub fn mismatched_attrs(&self, attrs: &NewFileContent) -> Vec<&'static str> {
        let mut mismatched = Vec::new();
        if self.artifact != attrs.artifact {
            mismatched.push("artifact");
        }
        if self.relative_path != attrs.relative_path {
            mismatched.push("relative_path");
        }
        mismatched
    }

    /// Fields of `recorded` that this record no longer carries with the
    /// same value. Fields only present here are ignored.
    pub fn drifted_fields(&self, recorded: &FileContent) -> Vec<String> {
        let mut drifted = Vec::new();
        if self.href != recorded.href {
            drifted.push("_href".to_string());
        }
        if self.artifact != recorded.artifact {
            drifted.push("artifact".to_string());
        }
        if self.relative_path != recorded.relative_path {
            drifted.push("relative_path".to_string());
        }
        for (key, value) in &recorded.extra {
            if self.extra.get(key) != Some(value) {
                drifted.push(key.clone());
            }
        }
        drifted
    }
}
