//! reqwest-backed GitLab REST client

use super::error::{FetchError, FetchResult};
use super::transport::{ApiResponse, Transport};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "https://gitlab.com";
/// Per-request timeout; large project listings can be slow to render server-side
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const API_PREFIX: &str = "/api/v4";
const ERROR_BODY_LIMIT: usize = 200;

/// GitLab REST API client authenticating with a personal/project access token
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl RestClient {
    pub fn new(host: &str, token: &str) -> FetchResult<Self> {
        Self::with_timeout(host, token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(host: &str, token: &str, timeout: Duration) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("glstats/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Transport {
                path: String::new(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        let base_url = normalise_base_url(host);
        log::debug!("Created GitLab REST client for {}", base_url);

        Ok(Self {
            base_url,
            token: token.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }
}

/// Accepts `gitlab.example.com`, `https://gitlab.example.com/` or a URL that
/// already ends in `/api/v4`.
fn normalise_base_url(host: &str) -> String {
    let host = host.trim();
    let host = if host.is_empty() { DEFAULT_HOST } else { host };
    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    };
    let trimmed = with_scheme.trim_end_matches('/');
    trimmed
        .strip_suffix(API_PREFIX)
        .unwrap_or(trimmed)
        .to_string()
}

#[async_trait]
impl Transport for RestClient {
    async fn get(&self, path: &str, query: &[(String, String)]) -> FetchResult<ApiResponse> {
        let url = self.url(path);
        log::trace!("GET {} {:?}", url, query);

        let mut request = self
            .client
            .get(&url)
            .query(query)
            .header(ACCEPT, "application/json");
        if !self.token.is_empty() {
            request = request.header("PRIVATE-TOKEN", &self.token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    path: path.to_string(),
                }
            } else {
                FetchError::Transport {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        let mut api_response = ApiResponse::new(status.as_u16(), Vec::new());
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                api_response = api_response.with_header(name.as_str(), value);
            }
        }

        let body = response.bytes().await.map_err(|e| FetchError::Transport {
            path: path.to_string(),
            message: format!("failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                body: text.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        api_response.body = body.to_vec();
        Ok(api_response)
    }
}
