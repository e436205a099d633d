//! Transport seam between the scanner and the HTTP layer
//!
//! The scanner only ever needs authenticated GETs, so the trait is a single
//! method. `RestClient` is the production implementation; tests substitute an
//! in-memory one.

use super::error::{FetchError, FetchResult};
use async_trait::async_trait;
use std::collections::HashMap;

/// Header carrying the exact collection size
pub const TOTAL_HEADER: &str = "x-total";
/// Header carrying the next page number (empty on the last page)
pub const NEXT_PAGE_HEADER: &str = "x-next-page";

/// Successful (2xx) response with the headers the fetcher cares about
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    /// Shorthand for a 200 response with a JSON body
    pub fn ok_json(value: &serde_json::Value) -> Self {
        Self::new(200, value.to_string())
    }

    /// Add a header; names are matched case-insensitively
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Value of `X-Total`, if present and numeric
    pub fn total_count(&self) -> Option<u64> {
        self.header(TOTAL_HEADER)
            .and_then(|v| v.trim().parse::<u64>().ok())
    }

    /// Value of `X-Next-Page`; `None` on the last page
    pub fn next_page(&self) -> Option<u32> {
        self.header(NEXT_PAGE_HEADER)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .and_then(|v| v.parse::<u32>().ok())
    }

    /// Decode the body as JSON
    pub fn json(&self, path: &str) -> FetchResult<serde_json::Value> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

/// Authenticated GET against the platform API.
///
/// `path` is relative to the API root (`/projects/42/repository/branches`).
/// Implementations return `FetchError::Status` for any non-2xx response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, query: &[(String, String)]) -> FetchResult<ApiResponse>;
}
