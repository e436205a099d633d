//! Raw project JSON to typed descriptor conversion
//!
//! Every field is optional in practice: listings omit `statistics` for
//! non-members, older instances lack `empty_repo`, and so on. Missing or
//! mistyped fields are zero-filled rather than failing the record.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Inline size and commit metadata from `?statistics=true`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BaseStatistics {
    pub commit_count: u64,
    pub storage_size: u64,
    pub repository_size: u64,
    pub wiki_size: u64,
    pub lfs_objects_size: u64,
    pub job_artifacts_size: u64,
}

/// Identity and cheap metadata for one repository
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepositoryDescriptor {
    pub id: u64,
    pub name: String,
    pub path: String,
    pub path_with_namespace: String,
    pub description: String,
    pub default_branch: String,
    pub web_url: String,
    pub visibility: String,
    pub archived: bool,
    pub empty_repo: bool,
    pub forked: bool,
    pub issues_enabled: bool,
    pub merge_requests_enabled: bool,
    pub wiki_enabled: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub last_activity_at: Option<DateTime<Utc>>,
    pub open_issues_count: u64,
    pub statistics: BaseStatistics,
}

impl RepositoryDescriptor {
    /// `group/sub` for `group/sub/project`; empty for a bare path
    pub fn namespace(&self) -> &str {
        match self.path_with_namespace.rfind('/') {
            Some(idx) if idx > 0 => &self.path_with_namespace[..idx],
            _ => "",
        }
    }

    /// Path when known, otherwise the numeric id
    pub fn display_name(&self) -> String {
        if self.path_with_namespace.is_empty() {
            self.id.to_string()
        } else {
            self.path_with_namespace.clone()
        }
    }
}

/// Group (namespace) identity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub full_path: String,
}

pub fn parse_project(raw: &Value) -> RepositoryDescriptor {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);

    let statistics = obj
        .get("statistics")
        .and_then(Value::as_object)
        .map(parse_statistics)
        .unwrap_or_default();

    RepositoryDescriptor {
        id: uint(obj, "id"),
        name: string(obj, "name"),
        path: string(obj, "path"),
        path_with_namespace: string(obj, "path_with_namespace"),
        description: string(obj, "description"),
        default_branch: string(obj, "default_branch"),
        web_url: string(obj, "web_url"),
        visibility: string(obj, "visibility"),
        archived: boolean(obj, "archived"),
        empty_repo: boolean(obj, "empty_repo"),
        forked: obj
            .get("forked_from_project")
            .map(|v| !v.is_null())
            .unwrap_or(false),
        issues_enabled: boolean(obj, "issues_enabled"),
        merge_requests_enabled: boolean(obj, "merge_requests_enabled"),
        wiki_enabled: boolean(obj, "wiki_enabled"),
        created_at: timestamp(obj, "created_at"),
        last_activity_at: timestamp(obj, "last_activity_at"),
        open_issues_count: uint(obj, "open_issues_count"),
        statistics,
    }
}

pub fn parse_group(raw: &Value) -> Group {
    let empty = Map::new();
    let obj = raw.as_object().unwrap_or(&empty);
    Group {
        id: uint(obj, "id"),
        name: string(obj, "name"),
        full_path: string(obj, "full_path"),
    }
}

fn parse_statistics(stats: &Map<String, Value>) -> BaseStatistics {
    BaseStatistics {
        commit_count: uint(stats, "commit_count"),
        storage_size: uint(stats, "storage_size"),
        repository_size: uint(stats, "repository_size"),
        wiki_size: uint(stats, "wiki_size"),
        lfs_objects_size: uint(stats, "lfs_objects_size"),
        job_artifacts_size: uint(stats, "job_artifacts_size"),
    }
}

// Sizes occasionally arrive as floats
fn uint(obj: &Map<String, Value>, key: &str) -> u64 {
    match obj.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        _ => 0,
    }
}

fn string(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn boolean(obj: &Map<String, Value>, key: &str) -> bool {
    obj.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn timestamp(obj: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    obj.get(key)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_project() {
        let raw = json!({
            "id": 42,
            "name": "api",
            "path": "api",
            "path_with_namespace": "platform/backend/api",
            "web_url": "https://gitlab.example.com/platform/backend/api",
            "archived": true,
            "empty_repo": false,
            "wiki_enabled": true,
            "forked_from_project": {"id": 7},
            "created_at": "2021-03-04T10:00:00.000Z",
            "last_activity_at": "2024-01-02T03:04:05Z",
            "open_issues_count": 12,
            "statistics": {
                "commit_count": 321,
                "repository_size": 2097152,
                "lfs_objects_size": 1048576.0
            }
        });

        let project = parse_project(&raw);
        assert_eq!(project.id, 42);
        assert_eq!(project.namespace(), "platform/backend");
        assert!(project.archived);
        assert!(project.forked);
        assert!(project.wiki_enabled);
        assert_eq!(project.open_issues_count, 12);
        assert_eq!(project.statistics.commit_count, 321);
        assert_eq!(project.statistics.lfs_objects_size, 1048576);
        assert_eq!(project.statistics.wiki_size, 0);
        assert!(project.created_at.is_some());
        assert!(project.last_activity_at.is_some());
    }

    #[test]
    fn test_parse_tolerates_missing_and_mistyped_fields() {
        let raw = json!({
            "id": "not-a-number",
            "name": null,
            "archived": "yes",
            "forked_from_project": null,
            "created_at": "yesterday",
            "statistics": "hidden"
        });

        let project = parse_project(&raw);
        assert_eq!(project.id, 0);
        assert_eq!(project.name, "");
        assert!(!project.archived);
        assert!(!project.forked);
        assert_eq!(project.created_at, None);
        assert_eq!(project.statistics, BaseStatistics::default());
    }

    #[test]
    fn test_parse_non_object() {
        assert_eq!(parse_project(&json!([1, 2])), RepositoryDescriptor::default());
    }

    #[test]
    fn test_namespace_of_top_level_path() {
        let project = RepositoryDescriptor {
            path_with_namespace: "solo".to_string(),
            ..Default::default()
        };
        assert_eq!(project.namespace(), "");
        assert_eq!(project.display_name(), "solo");
    }

    #[test]
    fn test_parse_group() {
        let group = parse_group(&json!({"id": 9, "name": "Tools", "full_path": "platform/tools"}));
        assert_eq!(group.id, 9);
        assert_eq!(group.full_path, "platform/tools");
    }
}
