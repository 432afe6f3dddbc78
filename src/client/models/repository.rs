//! Repository models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attributes posted to create a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRepository {
    pub name: String,
}

/// Repository as stored by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(rename = "_href")]
    pub href: String,

    pub name: String,

    /// Href of the newest version, absent until the first sync
    #[serde(rename = "_latest_version_href", default)]
    pub latest_version_href: Option<String>,

    #[serde(rename = "_versions_href", default)]
    pub versions_href: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Repository {
    /// Content listing of the latest version, if there is one
    pub fn latest_content_href(&self) -> Option<String> {
        self.latest_version_href.as_ref().map(|href| {
            if href.ends_with('/') {
                format!("{href}content/")
            } else {
                format!("{href}/content/")
            }
        })
    }
}
