//! Scanner Component
//!
//! Aggregates per-repository statistics across a GitLab instance:
//!
//! - **Discovery**: explicit project list, namespaces, or the global listing
//! - **RepositoryAggregator**: one statistics record per repository, with
//!   sub-resource failures degraded to zero
//! - **ScannerManager**: bounded worker pool plus a single-writer reducer
//! - **ProgressReporter**: start/update/finish hooks for the caller

pub mod aggregator;
pub mod api;
pub mod discovery;
pub mod error;
pub mod manager;
pub mod progress;
pub mod types;

pub use error::{ScanError, ScannerError};
pub use manager::{scan_repositories, ScannerManager};
pub use progress::{NoopProgress, ProgressReporter};
pub use types::{RepositoryStatistics, ScanOptions, ScanResult, ScanSummary};

#[cfg(test)]
mod tests;
