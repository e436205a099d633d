//! Scanner Error Types

use crate::core::error_handling::ContextualError;
use crate::gitlab::error::FetchError;
use thiserror::Error;

/// Repository-level failure: the base statistics for one repository could not
/// be fetched, or its aggregation task died. Recorded in the scan result; the
/// scan carries on.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("error processing project {repository}: {source}")]
pub struct ScanError {
    pub repository: String,
    #[source]
    pub source: RepositoryFailure,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RepositoryFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The aggregation task panicked
    #[error("aggregation task failed: {0}")]
    Aborted(String),
}

impl ScanError {
    pub fn new(repository: impl Into<String>, source: impl Into<RepositoryFailure>) -> Self {
        Self {
            repository: repository.into(),
            source: source.into(),
        }
    }

    pub fn aborted(repository: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(repository, RepositoryFailure::Aborted(message.into()))
    }
}

/// Scan-fatal failure; no result is produced
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScannerError {
    /// Listing or resolving the repository set failed
    #[error("failed to discover projects: {message}")]
    Discovery {
        message: String,
        #[source]
        source: Option<FetchError>,
    },

    /// Interrupted by signal or deadline before the reducer drained
    #[error("scan cancelled")]
    Cancelled,

    /// Invalid scan options
    #[error("invalid scan configuration: {message}")]
    Configuration { message: String },

    /// A worker task died outside any repository's aggregation
    #[error("scan worker failed: {message}")]
    Worker { message: String },
}

impl ScannerError {
    pub fn discovery(message: impl Into<String>, source: FetchError) -> Self {
        ScannerError::Discovery {
            message: message.into(),
            source: Some(source),
        }
    }
}

impl ContextualError for ScannerError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ScannerError::Configuration { .. } => true,
            ScannerError::Discovery {
                source: Some(source),
                ..
            } => source.is_auth_failure() || source.is_not_found(),
            ScannerError::Discovery { source: None, .. } => true,
            ScannerError::Cancelled | ScannerError::Worker { .. } => false,
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            ScannerError::Configuration { message } => Some(message.clone()),
            ScannerError::Discovery {
                source: Some(source),
                message,
            } => source
                .user_message()
                .or_else(|| source.is_not_found().then(|| format!("{} (not found)", message))),
            ScannerError::Discovery {
                source: None,
                message,
            } => Some(message.clone()),
            ScannerError::Cancelled | ScannerError::Worker { .. } => None,
        }
    }
}
