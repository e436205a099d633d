//! Repository Resource Aggregator
//!
//! Builds the statistics record for one repository. Only the base statistics
//! request can fail the repository; every other count degrades to zero.

use crate::gitlab::counts::{
    array_len_field, bounded_fold, bounded_sum, has_any, header_count, numeric_field,
    CountLimits,
};
use crate::gitlab::endpoints;
use crate::gitlab::pagination::{fetch_object, query};
use crate::gitlab::project::{parse_project, RepositoryDescriptor};
use crate::gitlab::transport::Transport;
use crate::scanner::error::ScanError;
use crate::scanner::types::{RepositoryStatistics, DEFAULT_PROTECTED_BRANCH_STEP};
use serde_json::Value;
use std::sync::Arc;

/// Estimated protected branch count.
///
/// The API has no cheap count of protected branches, so the default branch is
/// assumed protected plus one more per `step` additional branches, never more
/// than the branch count itself.
pub fn estimate_protected_branches(branch_count: u64, step: u64) -> u64 {
    if branch_count == 0 {
        return 0;
    }
    let step = step.max(1);
    (1 + (branch_count - 1) / step).min(branch_count)
}

#[derive(Clone)]
pub struct RepositoryAggregator {
    transport: Arc<dyn Transport>,
    limits: CountLimits,
    protected_branch_step: u64,
}

impl RepositoryAggregator {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            limits: CountLimits::default(),
            protected_branch_step: DEFAULT_PROTECTED_BRANCH_STEP,
        }
    }

    pub fn with_limits(mut self, limits: CountLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_protected_branch_step(mut self, step: u64) -> Self {
        self.protected_branch_step = step.max(1);
        self
    }

    /// Fetch every sub-resource count for `descriptor`, one request category
    /// at a time.
    pub async fn aggregate(
        &self,
        descriptor: &RepositoryDescriptor,
    ) -> Result<RepositoryStatistics, ScanError> {
        let transport = self.transport.as_ref();
        let id = descriptor.id;
        log::debug!("Processing {} (id {})", descriptor.display_name(), id);

        let raw = fetch_object(
            transport,
            &endpoints::project_by_id(id),
            &query(&[("statistics", "true")]),
        )
        .await
        .map_err(|e| ScanError::new(descriptor.display_name(), e))?;
        let project = merge_descriptor(descriptor, &raw);

        let mut stats = RepositoryStatistics::from_descriptor(&project);
        let scope_all = query(&[("scope", "all")]);

        stats.mr_count = header_count(transport, &endpoints::merge_requests(id), &scope_all).await;
        stats.branch_count = header_count(transport, &endpoints::branches(id), &[]).await;
        stats.tag_count = header_count(transport, &endpoints::tags(id), &[]).await;
        stats.collaborator_count = header_count(transport, &endpoints::members(id), &[]).await;
        stats.milestone_count = header_count(transport, &endpoints::milestones(id), &[]).await;
        stats.release_count = header_count(transport, &endpoints::releases(id), &[]).await;

        stats.has_wiki = if project.wiki_enabled {
            has_any(transport, &endpoints::wikis(id), &[])
                .await
                .unwrap_or_else(|e| {
                    log::debug!("Wiki check for {} failed: {}", project.display_name(), e);
                    false
                })
        } else {
            false
        };

        let approvals = array_len_field("approved_by");
        let notes = numeric_field("user_notes_count");
        let ((reviews, mr_comments), mr_truncated) = match bounded_fold(
            transport,
            &endpoints::merge_requests(id),
            &scope_all,
            self.limits,
            (0u64, 0u64),
            |(reviews, comments), item| {
                (
                    reviews.saturating_add(approvals(item)),
                    comments.saturating_add(notes(item)),
                )
            },
        )
        .await
        {
            Ok(folded) => folded,
            Err(e) => {
                log::debug!("Merge request summation for {} failed: {}", id, e);
                ((0, 0), false)
            }
        };
        let (issue_comments, issue_comments_truncated) = self
            .sum_or_zero(
                &endpoints::issues(id),
                &scope_all,
                numeric_field("user_notes_count"),
            )
            .await;

        stats.mr_review_count = reviews;
        stats.mr_comment_count = mr_comments;
        stats.issue_comment_count = issue_comments;
        stats.summation_truncated = mr_truncated || issue_comments_truncated;

        stats.protected_branch_count =
            estimate_protected_branches(stats.branch_count, self.protected_branch_step);

        let stats = stats.finalize();
        log::debug!(
            "{}: branches {}, tags {}, members {}, issues {}, MRs {}, reviews {}, comments {}/{}",
            project.display_name(),
            stats.branch_count,
            stats.tag_count,
            stats.collaborator_count,
            stats.issue_count,
            stats.mr_count,
            stats.mr_review_count,
            stats.mr_comment_count,
            stats.issue_comment_count
        );
        Ok(stats)
    }

    async fn sum_or_zero<F>(&self, path: &str, extra: &[(String, String)], field: F) -> (u64, bool)
    where
        F: Fn(&Value) -> u64 + Send + Sync,
    {
        match bounded_sum(self.transport.as_ref(), path, extra, self.limits, field).await {
            Ok(outcome) => (outcome.total, outcome.truncated),
            Err(e) => {
                log::debug!("Summation over {} failed: {}", path, e);
                (0, false)
            }
        }
    }
}

/// Detailed project fields win; identity falls back to the listing when the
/// detailed payload lacks it.
fn merge_descriptor(listed: &RepositoryDescriptor, raw: &Value) -> RepositoryDescriptor {
    let mut detailed = parse_project(raw);
    if detailed.id == 0 {
        detailed.id = listed.id;
    }
    if detailed.path_with_namespace.is_empty() {
        detailed.path_with_namespace = listed.path_with_namespace.clone();
    }
    if detailed.name.is_empty() {
        detailed.name = listed.name.clone();
    }
    if detailed.web_url.is_empty() {
        detailed.web_url = listed.web_url.clone();
    }
    if detailed.created_at.is_none() {
        detailed.created_at = listed.created_at;
    }
    if detailed.last_activity_at.is_none() {
        detailed.last_activity_at = listed.last_activity_at;
    }
    detailed
}
