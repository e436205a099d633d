//! Shared fixtures for integration tests against a mock GitLab server

#![allow(dead_code)]

use httpmock::prelude::*;
use serde_json::{json, Value};

pub const TOKEN: &str = "glpat-integration";

/// Project payload as returned by `/projects` and `/projects/:id`
pub fn project_json(id: u64, path: &str, wiki_enabled: bool) -> Value {
    let name = path.rsplit('/').next().unwrap_or_default();
    json!({
        "id": id,
        "name": name,
        "path": name,
        "path_with_namespace": path,
        "web_url": format!("https://gitlab.example.com/{}", path),
        "archived": false,
        "empty_repo": false,
        "forked_from_project": null,
        "wiki_enabled": wiki_enabled,
        "open_issues_count": 5,
        "created_at": "2021-03-04T05:06:07Z",
        "last_activity_at": "2024-02-03T04:05:06Z",
        "statistics": {
            "commit_count": 40,
            "repository_size": 3 * 1024 * 1024,
            "lfs_objects_size": 1024 * 1024
        }
    })
}

/// Answer a page-size-1 count probe on `path` with `X-Total: total`
pub async fn mock_total(server: &MockServer, path: &str, total: u64) {
    let path = format!("/api/v4{}", path);
    server
        .mock_async(|when, then| {
            when.method(GET).path(path).query_param("per_page", "1");
            then.status(200)
                .header("X-Total", total.to_string())
                .json_body(json!([{}]));
        })
        .await;
}
