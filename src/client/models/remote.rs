//! Remote models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Attributes posted to create a file remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRemote {
    pub name: String,

    /// Manifest URL of the feed
    pub feed_url: String,
}

/// File remote as stored by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRemote {
    #[serde(rename = "_href")]
    pub href: String,

    pub name: String,

    #[serde(default)]
    pub feed_url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FileRemote {
    /// Endpoint that triggers a sync from this remote
    pub fn sync_href(&self) -> String {
        format!("{}sync/", with_trailing_slash(&self.href))
    }
}

fn with_trailing_slash(href: &str) -> String {
    if href.ends_with('/') {
        href.to_string()
    } else {
        format!("{href}/")
    }
}
