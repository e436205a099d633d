//! CSV report formatter

use super::{OutputFormat, OutputResult, ReportFormatter};
use crate::scanner::types::RepositoryStatistics;
use chrono::{DateTime, SecondsFormat, Utc};

/// Column order of the migration inventory report
pub const HEADERS: &[&str] = &[
    "Namespace",
    "Project",
    "Is_Empty",
    "isFork",
    "isArchive",
    "Project_Size(mb)",
    "LFS_Size(mb)",
    "Record_Count",
    "Collaborator_Count",
    "Protected_Branch_Count",
    "MR_Review_Count",
    "Milestone_Count",
    "Issue_Count",
    "MR_Count",
    "MR_Review_Comment_Count",
    "Commit_Count",
    "Issue_Comment_Count",
    "Release_Count",
    "Branch_Count",
    "Tag_Count",
    "Has_Wiki",
    "Full_URL",
    "Created",
    "Last_Push",
    "Last_Update",
    "Migration_Issue",
];

pub struct CsvFormatter {
    delimiter: char,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self { delimiter: ',' }
    }

    /// Escape CSV value if needed
    fn escape_csv_value(&self, value: &str) -> String {
        if value.contains(self.delimiter)
            || value.contains('"')
            || value.contains('\n')
            || value.contains('\r')
        {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }

    fn row(&self, stat: &RepositoryStatistics) -> Vec<String> {
        vec![
            stat.namespace.clone(),
            stat.name.clone(),
            stat.is_empty.to_string(),
            stat.is_fork.to_string(),
            stat.is_archived.to_string(),
            format!("{:.0}", stat.repo_size_mb),
            format!("{:.0}", stat.lfs_size_mb),
            stat.record_count.to_string(),
            stat.collaborator_count.to_string(),
            stat.protected_branch_count.to_string(),
            stat.mr_review_count.to_string(),
            stat.milestone_count.to_string(),
            stat.issue_count.to_string(),
            stat.mr_count.to_string(),
            stat.mr_comment_count.to_string(),
            stat.commit_count.to_string(),
            stat.issue_comment_count.to_string(),
            stat.release_count.to_string(),
            stat.branch_count.to_string(),
            stat.tag_count.to_string(),
            stat.has_wiki.to_string(),
            stat.full_url.clone(),
            timestamp(stat.created),
            timestamp(stat.last_push),
            timestamp(stat.last_update),
            stat.migration_issue.to_string(),
        ]
    }

    fn join(&self, values: impl Iterator<Item = String>) -> String {
        let escaped: Vec<String> = values.map(|v| self.escape_csv_value(&v)).collect();
        escaped.join(&self.delimiter.to_string())
    }
}

fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

impl ReportFormatter for CsvFormatter {
    /// Header row is always written, even with no records
    fn render(&self, stats: &[RepositoryStatistics]) -> OutputResult<String> {
        let mut result = self.join(HEADERS.iter().map(|h| h.to_string()));
        result.push('\n');
        for stat in stats {
            result.push_str(&self.join(self.row(stat).into_iter()));
            result.push('\n');
        }
        Ok(result)
    }

    fn format_type(&self) -> OutputFormat {
        OutputFormat::Csv
    }
}
