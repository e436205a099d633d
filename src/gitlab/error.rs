//! Fetch Error Types

use crate::core::error_handling::ContextualError;
use thiserror::Error;

/// Failure of a single request against the GitLab REST API.
///
/// Nothing here is retried; callers decide whether a failure zeroes one
/// statistic, fails one repository or aborts discovery.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Connection, TLS or body read failure
    #[error("request to {path} failed: {message}")]
    Transport { path: String, message: String },

    /// The client-level timeout elapsed
    #[error("request to {path} timed out")]
    Timeout { path: String },

    /// Non-2xx response
    #[error("HTTP {status} from {path}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    /// The payload was not the JSON shape expected for this endpoint
    #[error("failed to decode response from {path}: {message}")]
    Decode { path: String, message: String },
}

impl FetchError {
    pub fn path(&self) -> &str {
        match self {
            FetchError::Transport { path, .. }
            | FetchError::Timeout { path }
            | FetchError::Status { path, .. }
            | FetchError::Decode { path, .. } => path,
        }
    }

    /// 401/403: the token is missing, expired or lacks scope
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, FetchError::Status { status: 401 | 403, .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::Status { status: 404, .. })
    }
}

impl ContextualError for FetchError {
    fn is_user_actionable(&self) -> bool {
        self.is_auth_failure()
    }

    fn user_message(&self) -> Option<String> {
        match self {
            FetchError::Status { status, path, .. } if self.is_auth_failure() => Some(format!(
                "GitLab rejected the access token (HTTP {}) for {}; check the token and its read_api scope",
                status, path
            )),
            _ => None,
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
