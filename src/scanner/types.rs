//! Scanner Types
//!
//! Options going into a scan and the records coming out of it.

use crate::gitlab::client::DEFAULT_HOST;
use crate::gitlab::counts::CountLimits;
use crate::gitlab::project::RepositoryDescriptor;
use crate::output::OutputFormat;
use crate::scanner::error::{ScanError, ScannerError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_WORKERS: usize = 5;
/// One extra protected branch assumed per this many branches beyond the first
pub const DEFAULT_PROTECTED_BRANCH_STEP: u64 = 10;
/// Above this many records a repository is flagged for migration review
pub const MIGRATION_RECORD_THRESHOLD: u64 = 60_000;
/// Above this repository size (MB) a repository is flagged for migration review
pub const MIGRATION_SIZE_THRESHOLD_MB: f64 = 1_500.0;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Statistics record for one repository.
///
/// `protected_branch_count` is an estimate derived from `branch_count`.
/// `mr_review_count`, `mr_comment_count` and `issue_comment_count` are sums
/// over a bounded number of pages and are lower bounds when
/// `summation_truncated` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepositoryStatistics {
    pub id: u64,
    pub namespace: String,
    pub name: String,
    pub path_with_namespace: String,
    pub is_empty: bool,
    pub is_fork: bool,
    pub is_archived: bool,
    pub repo_size_mb: f64,
    pub lfs_size_mb: f64,
    pub record_count: u64,
    pub collaborator_count: u64,
    pub protected_branch_count: u64,
    pub mr_review_count: u64,
    pub milestone_count: u64,
    pub issue_count: u64,
    pub mr_count: u64,
    pub mr_comment_count: u64,
    pub commit_count: u64,
    pub issue_comment_count: u64,
    pub release_count: u64,
    pub branch_count: u64,
    pub tag_count: u64,
    pub has_wiki: bool,
    pub full_url: String,
    pub created: Option<DateTime<Utc>>,
    pub last_push: Option<DateTime<Utc>>,
    pub last_update: Option<DateTime<Utc>>,
    pub migration_issue: bool,
    pub summation_truncated: bool,
}

impl RepositoryStatistics {
    /// Identity and inline size fields from the descriptor; counts start at zero
    pub fn from_descriptor(project: &RepositoryDescriptor) -> Self {
        Self {
            id: project.id,
            namespace: project.namespace().to_string(),
            name: project.name.clone(),
            path_with_namespace: project.path_with_namespace.clone(),
            is_empty: project.empty_repo,
            is_fork: project.forked,
            is_archived: project.archived,
            repo_size_mb: bytes_to_mb(project.statistics.repository_size),
            lfs_size_mb: bytes_to_mb(project.statistics.lfs_objects_size),
            commit_count: project.statistics.commit_count,
            issue_count: project.open_issues_count,
            full_url: project.web_url.clone(),
            created: project.created_at,
            last_push: project.last_activity_at,
            last_update: project.last_activity_at,
            ..Default::default()
        }
    }

    /// Compute the derived fields once every count is in
    pub fn finalize(mut self) -> Self {
        // Counts come from server headers; saturate rather than overflow
        self.record_count = [
            self.commit_count,
            self.issue_count,
            self.mr_count,
            self.milestone_count,
            self.release_count,
            self.branch_count,
            self.tag_count,
            self.mr_comment_count,
            self.issue_comment_count,
        ]
        .into_iter()
        .fold(0, u64::saturating_add);
        self.migration_issue = self.record_count > MIGRATION_RECORD_THRESHOLD
            || self.repo_size_mb > MIGRATION_SIZE_THRESHOLD_MB;
        self
    }
}

fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Immutable scan configuration, shared read-only by every worker
#[derive(Clone)]
pub struct ScanOptions {
    pub host: String,
    pub token: String,
    /// Group paths whose projects (including subgroups) are scanned
    pub namespaces: Vec<String>,
    /// Explicit project ids or paths; takes the place of any listing
    pub projects: Vec<String>,
    pub output_format: OutputFormat,
    pub output_file: Option<PathBuf>,
    pub verbose: bool,
    pub max_projects: Option<usize>,
    pub workers: usize,
    pub include_archived: bool,
    pub limits: CountLimits,
    pub protected_branch_step: u64,
}

impl std::fmt::Debug for ScanOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanOptions")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("namespaces", &self.namespaces)
            .field("projects", &self.projects)
            .field("output_format", &self.output_format)
            .field("output_file", &self.output_file)
            .field("verbose", &self.verbose)
            .field("max_projects", &self.max_projects)
            .field("workers", &self.workers)
            .field("include_archived", &self.include_archived)
            .field("limits", &self.limits)
            .field("protected_branch_step", &self.protected_branch_step)
            .finish()
    }
}

impl ScanOptions {
    pub fn builder() -> ScanOptionsBuilder {
        ScanOptionsBuilder::new()
    }

    /// Worker pool width for `discovered` repositories
    pub fn effective_workers(&self, discovered: usize) -> usize {
        let mut width = self.workers.max(1);
        if let Some(cap) = self.max_projects.filter(|cap| *cap > 0) {
            width = width.min(cap);
        }
        width.min(discovered).max(1)
    }
}

/// Builder for ScanOptions
#[derive(Debug, Default)]
pub struct ScanOptionsBuilder {
    host: Option<String>,
    token: Option<String>,
    namespaces: Vec<String>,
    projects: Vec<String>,
    output_format: Option<OutputFormat>,
    output_file: Option<PathBuf>,
    verbose: bool,
    max_projects: Option<usize>,
    workers: Option<usize>,
    include_archived: Option<bool>,
    limits: Option<CountLimits>,
    protected_branch_step: Option<u64>,
}

impl ScanOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn namespaces(mut self, namespaces: Vec<String>) -> Self {
        self.namespaces = namespaces;
        self
    }

    pub fn projects(mut self, projects: Vec<String>) -> Self {
        self.projects = projects;
        self
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn output_file(mut self, path: Option<PathBuf>) -> Self {
        self.output_file = path;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn max_projects(mut self, max: Option<usize>) -> Self {
        self.max_projects = max;
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn include_archived(mut self, include: bool) -> Self {
        self.include_archived = Some(include);
        self
    }

    pub fn limits(mut self, limits: CountLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn protected_branch_step(mut self, step: u64) -> Self {
        self.protected_branch_step = Some(step);
        self
    }

    pub fn build(self) -> Result<ScanOptions, ScannerError> {
        let workers = self.workers.unwrap_or(DEFAULT_WORKERS);
        if workers == 0 {
            return Err(ScannerError::Configuration {
                message: "worker count must be at least 1".to_string(),
            });
        }
        if self.max_projects == Some(0) {
            return Err(ScannerError::Configuration {
                message: "max projects must be at least 1 when set".to_string(),
            });
        }
        let protected_branch_step = self
            .protected_branch_step
            .unwrap_or(DEFAULT_PROTECTED_BRANCH_STEP);
        if protected_branch_step == 0 {
            return Err(ScannerError::Configuration {
                message: "protected branch step must be at least 1".to_string(),
            });
        }
        if !self.namespaces.is_empty() && !self.projects.is_empty() {
            return Err(ScannerError::Configuration {
                message: "namespaces and an explicit project list cannot be combined".to_string(),
            });
        }

        Ok(ScanOptions {
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            token: self.token.unwrap_or_default(),
            namespaces: self.namespaces,
            projects: self.projects,
            output_format: self.output_format.unwrap_or_default(),
            output_file: self.output_file,
            verbose: self.verbose,
            max_projects: self.max_projects,
            workers,
            include_archived: self.include_archived.unwrap_or(true),
            limits: self.limits.unwrap_or_default(),
            protected_branch_step,
        })
    }
}

/// Outcome of a completed scan
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub total_projects: usize,
    pub processed_projects: usize,
    pub repository_stats: Vec<RepositoryStatistics>,
    pub errors: Vec<ScanError>,
    pub duration: Duration,
}

impl ScanResult {
    pub fn summary(&self) -> ScanSummary {
        let average = if self.processed_projects > 0 {
            self.duration / self.processed_projects as u32
        } else {
            Duration::ZERO
        };
        ScanSummary {
            total_projects: self.total_projects,
            processed_projects: self.processed_projects,
            error_count: self.errors.len(),
            truncated_count: self
                .repository_stats
                .iter()
                .filter(|s| s.summation_truncated)
                .count(),
            migration_issue_count: self
                .repository_stats
                .iter()
                .filter(|s| s.migration_issue)
                .count(),
            duration: self.duration,
            average_per_project: average,
        }
    }
}

/// Headline numbers for the end-of-scan report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub total_projects: usize,
    pub processed_projects: usize,
    pub error_count: usize,
    pub truncated_count: usize,
    pub migration_issue_count: usize,
    pub duration: Duration,
    pub average_per_project: Duration,
}
