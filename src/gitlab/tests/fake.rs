//! In-memory `Transport` for unit tests
//!
//! Collections are paginated from a fixed item list using the `page` and
//! `per_page` query parameters, with `X-Total` and `X-Next-Page` headers set
//! the way the platform sets them. Unknown paths answer 404.

use crate::gitlab::error::{FetchError, FetchResult};
use crate::gitlab::transport::{ApiResponse, Transport, NEXT_PAGE_HEADER, TOTAL_HEADER};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Route {
    Collection { items: Vec<Value>, with_total: bool },
    Object(Value),
    Failure(u16),
}

#[derive(Debug, Default)]
pub struct FakeTransport {
    routes: HashMap<String, Route>,
    page_failures: HashMap<(String, usize), u16>,
    reported_totals: HashMap<String, u64>,
    delay: Option<Duration>,
    requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, path: &str, items: Vec<Value>) -> Self {
        self.routes.insert(
            path.to_string(),
            Route::Collection {
                items,
                with_total: true,
            },
        );
        self
    }

    /// Collection whose responses carry no `X-Total` header
    pub fn with_untotalled_collection(mut self, path: &str, items: Vec<Value>) -> Self {
        self.routes.insert(
            path.to_string(),
            Route::Collection {
                items,
                with_total: false,
            },
        );
        self
    }

    pub fn with_object(mut self, path: &str, value: Value) -> Self {
        self.routes.insert(path.to_string(), Route::Object(value));
        self
    }

    pub fn with_failure(mut self, path: &str, status: u16) -> Self {
        self.routes.insert(path.to_string(), Route::Failure(status));
        self
    }

    /// Fail only requests for `page` of `path`; other pages answer normally
    pub fn with_page_failure(mut self, path: &str, page: usize, status: u16) -> Self {
        self.page_failures.insert((path.to_string(), page), status);
        self
    }

    /// Report `total` in `X-Total` for `path` whatever its items
    pub fn with_reported_total(mut self, path: &str, total: u64) -> Self {
        self.reported_totals.insert(path.to_string(), total);
        self
    }

    /// Sleep before answering every request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn request_count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .count()
    }

    pub fn total_requests(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Query of every request made to `path`, in order
    pub fn queries_for(&self, path: &str) -> Vec<Vec<(String, String)>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, q)| q.clone())
            .collect()
    }

    fn respond(&self, path: &str, query: &[(String, String)]) -> FetchResult<ApiResponse> {
        let page = param(query, "page").unwrap_or(1).max(1);
        if let Some(status) = self.page_failures.get(&(path.to_string(), page)) {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: *status,
                body: format!("simulated failure on page {}", page),
            });
        }

        match self.routes.get(path) {
            Some(Route::Collection { items, with_total }) => {
                let per_page = param(query, "per_page").unwrap_or(20).max(1);
                let start = ((page - 1) * per_page).min(items.len());
                let end = (start + per_page).min(items.len());
                let slice = Value::Array(items[start..end].to_vec());

                let next = if end < items.len() {
                    (page + 1).to_string()
                } else {
                    String::new()
                };
                let mut response =
                    ApiResponse::ok_json(&slice).with_header(NEXT_PAGE_HEADER, next);
                if let Some(total) = self.reported_totals.get(path) {
                    response = response.with_header(TOTAL_HEADER, total.to_string());
                } else if *with_total {
                    response = response.with_header(TOTAL_HEADER, items.len().to_string());
                }
                Ok(response)
            }
            Some(Route::Object(value)) => Ok(ApiResponse::ok_json(value)),
            Some(Route::Failure(status)) => Err(FetchError::Status {
                path: path.to_string(),
                status: *status,
                body: "simulated failure".to_string(),
            }),
            None => Err(FetchError::Status {
                path: path.to_string(),
                status: 404,
                body: "{\"message\":\"404 Not Found\"}".to_string(),
            }),
        }
    }
}

fn param(query: &[(String, String)], name: &str) -> Option<usize> {
    query
        .iter()
        .rev()
        .find(|(k, _)| k == name)
        .and_then(|(_, v)| v.parse().ok())
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, path: &str, query: &[(String, String)]) -> FetchResult<ApiResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((path.to_string(), query.to_vec()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.respond(path, query)
    }
}

/// `count` items each carrying `field: value`
pub fn items_with(field: &str, value: Value, count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let mut item = serde_json::Map::new();
            item.insert("id".to_string(), Value::from(i as u64 + 1));
            item.insert(field.to_string(), value.clone());
            Value::Object(item)
        })
        .collect()
}

/// `count` placeholder items
pub fn items(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| serde_json::json!({ "id": i as u64 + 1 }))
        .collect()
}
