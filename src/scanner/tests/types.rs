//! Tests for scanner option and result types

use crate::core::error_handling::ContextualError;
use crate::gitlab::counts::CountLimits;
use crate::gitlab::error::FetchError;
use crate::gitlab::project::{BaseStatistics, RepositoryDescriptor};
use crate::output::OutputFormat;
use crate::scanner::error::{ScanError, ScannerError};
use crate::scanner::types::*;
use std::time::Duration;

#[test]
fn test_builder_defaults() {
    let options = ScanOptions::builder().token("secret").build().unwrap();

    assert_eq!(options.host, "https://gitlab.com");
    assert_eq!(options.workers, DEFAULT_WORKERS);
    assert_eq!(options.limits, CountLimits::default());
    assert_eq!(options.protected_branch_step, DEFAULT_PROTECTED_BRANCH_STEP);
    assert_eq!(options.output_format, OutputFormat::Csv);
    assert!(options.include_archived);
    assert!(options.max_projects.is_none());
}

#[test]
fn test_debug_redacts_token() {
    let options = ScanOptions::builder().token("glpat-abcdef").build().unwrap();
    let debug = format!("{:?}", options);
    assert!(!debug.contains("glpat-abcdef"));
    assert!(debug.contains("<redacted>"));
}

#[test]
fn test_builder_rejects_invalid_values() {
    let zero_workers = ScanOptions::builder().workers(0).build().unwrap_err();
    assert!(zero_workers.is_user_actionable());

    assert!(ScanOptions::builder().max_projects(Some(0)).build().is_err());
    assert!(ScanOptions::builder().protected_branch_step(0).build().is_err());

    let mixed = ScanOptions::builder()
        .namespaces(vec!["platform".to_string()])
        .projects(vec!["42".to_string()])
        .build()
        .unwrap_err();
    assert!(matches!(mixed, ScannerError::Configuration { .. }));
}

#[test]
fn test_effective_workers() {
    let options = ScanOptions::builder().build().unwrap();
    assert_eq!(options.effective_workers(100), 5);
    assert_eq!(options.effective_workers(3), 3);
    assert_eq!(options.effective_workers(0), 1);

    let capped = ScanOptions::builder()
        .workers(8)
        .max_projects(Some(2))
        .build()
        .unwrap();
    assert_eq!(capped.effective_workers(100), 2);
}

#[test]
fn test_statistics_from_descriptor() {
    let descriptor = RepositoryDescriptor {
        id: 5,
        name: "web".to_string(),
        path_with_namespace: "apps/frontend/web".to_string(),
        web_url: "https://gitlab.example.com/apps/frontend/web".to_string(),
        archived: true,
        forked: true,
        open_issues_count: 9,
        statistics: BaseStatistics {
            commit_count: 40,
            repository_size: 3 * 1024 * 1024,
            lfs_objects_size: 512 * 1024,
            ..Default::default()
        },
        ..Default::default()
    };

    let stats = RepositoryStatistics::from_descriptor(&descriptor);
    assert_eq!(stats.namespace, "apps/frontend");
    assert!(stats.is_archived);
    assert!(stats.is_fork);
    assert_eq!(stats.issue_count, 9);
    assert_eq!(stats.commit_count, 40);
    assert!((stats.repo_size_mb - 3.0).abs() < f64::EPSILON);
    assert!((stats.lfs_size_mb - 0.5).abs() < f64::EPSILON);
    assert_eq!(stats.branch_count, 0);
}

#[test]
fn test_finalize_flags_migration_issues() {
    let small = RepositoryStatistics {
        commit_count: 100,
        branch_count: 3,
        ..Default::default()
    }
    .finalize();
    assert_eq!(small.record_count, 103);
    assert!(!small.migration_issue);

    let busy = RepositoryStatistics {
        commit_count: 59_000,
        mr_comment_count: 1_500,
        ..Default::default()
    }
    .finalize();
    assert!(busy.migration_issue);

    let large = RepositoryStatistics {
        repo_size_mb: 1_600.0,
        ..Default::default()
    }
    .finalize();
    assert_eq!(large.record_count, 0);
    assert!(large.migration_issue);
}

#[test]
fn test_finalize_saturates_huge_counts() {
    let stats = RepositoryStatistics {
        branch_count: u64::MAX,
        tag_count: u64::MAX,
        commit_count: 10,
        ..Default::default()
    }
    .finalize();
    assert_eq!(stats.record_count, u64::MAX);
    assert!(stats.migration_issue);
}

#[test]
fn test_summary_average() {
    let result = ScanResult {
        total_projects: 5,
        processed_projects: 4,
        repository_stats: vec![
            RepositoryStatistics {
                summation_truncated: true,
                ..Default::default()
            },
            RepositoryStatistics::default(),
        ],
        errors: vec![ScanError::new(
            "apps/broken",
            FetchError::Timeout {
                path: "/projects/9".to_string(),
            },
        )],
        duration: Duration::from_secs(8),
    };

    let summary = result.summary();
    assert_eq!(summary.error_count, 1);
    assert_eq!(summary.truncated_count, 1);
    assert_eq!(summary.average_per_project, Duration::from_secs(2));
}

#[test]
fn test_summary_of_empty_scan() {
    let summary = ScanResult::default().summary();
    assert_eq!(summary.average_per_project, Duration::ZERO);
}
