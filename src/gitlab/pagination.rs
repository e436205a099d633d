//! Paginated Fetcher
//!
//! One request, one page. Looping over pages is left to the count strategies
//! and discovery so each can apply its own stopping rule.

use super::error::{FetchError, FetchResult};
use super::transport::Transport;
use serde_json::Value;

/// Platform cap on `per_page`
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page number and page size for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Pages are 1-based; `per_page` is clamped to `1..=MAX_PAGE_SIZE`
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn first(per_page: u32) -> Self {
        Self::new(1, per_page)
    }

    pub fn next(self) -> Self {
        Self::new(self.page + 1, self.per_page)
    }

    fn to_query(self) -> [(String, String); 2] {
        [
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ]
    }
}

/// Decoded items for one page plus the pagination headers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Value>,
    pub next_page: Option<u32>,
    pub total: Option<u64>,
}

impl Page {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// A short page means there is nothing after it
    pub fn is_last(&self, request: PageRequest) -> bool {
        self.items.len() < request.per_page as usize
    }
}

/// Fetch one page of a collection resource.
///
/// `extra` carries endpoint-specific filters (`scope=all`, `statistics=true`);
/// the page parameters are appended after them.
pub async fn fetch_page(
    transport: &dyn Transport,
    path: &str,
    request: PageRequest,
    extra: &[(String, String)],
) -> FetchResult<Page> {
    let mut query: Vec<(String, String)> = extra.to_vec();
    query.extend(request.to_query());

    let response = transport.get(path, &query).await?;
    let items = match response.json(path)? {
        Value::Array(items) => items,
        other => {
            return Err(FetchError::Decode {
                path: path.to_string(),
                message: format!("expected a JSON array, got {}", json_kind(&other)),
            })
        }
    };

    Ok(Page {
        items,
        next_page: response.next_page(),
        total: response.total_count(),
    })
}

/// Fetch a single JSON object (project, group)
pub async fn fetch_object(
    transport: &dyn Transport,
    path: &str,
    query: &[(String, String)],
) -> FetchResult<Value> {
    let response = transport.get(path, query).await?;
    match response.json(path)? {
        value @ Value::Object(_) => Ok(value),
        other => Err(FetchError::Decode {
            path: path.to_string(),
            message: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Build a query list from string pairs
pub fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
