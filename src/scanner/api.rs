//! Scanner API
//!
//! Public surface of the scanner for the CLI layer and library users.

// Entry points
pub use crate::scanner::manager::{scan_repositories, ScannerManager};

// Error handling
pub use crate::scanner::error::{RepositoryFailure, ScanError, ScannerError};

// Progress reporting
pub use crate::scanner::progress::{LogProgress, NoopProgress, ProgressReporter};

// Core data types
pub use crate::scanner::aggregator::{estimate_protected_branches, RepositoryAggregator};
pub use crate::scanner::types::{
    RepositoryStatistics, ScanOptions, ScanOptionsBuilder, ScanResult, ScanSummary,
};
