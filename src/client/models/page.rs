//! Paginated list responses

use serde::{Deserialize, Serialize};

/// One page of a list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of items across all pages
    #[serde(default)]
    pub count: usize,

    /// Absolute URL of the next page
    #[serde(default)]
    pub next: Option<String>,

    /// Absolute URL of the previous page
    #[serde(default)]
    pub previous: Option<String>,

    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}
