//! Fixtures describing a small fake GitLab instance

use crate::gitlab::tests::fake::{items, items_with, FakeTransport};
use crate::scanner::progress::ProgressReporter;
use serde_json::{json, Value};

/// Shape of one fake project
#[derive(Debug, Clone)]
pub struct FakeProject {
    pub id: u64,
    pub path: String,
    pub branches: usize,
    pub wiki_enabled: bool,
    pub wiki_pages: usize,
}

impl FakeProject {
    pub fn new(id: u64, branches: usize) -> Self {
        Self {
            id,
            path: format!("platform/project-{}", id),
            branches,
            wiki_enabled: true,
            wiki_pages: 1,
        }
    }

    pub fn without_wiki(mut self) -> Self {
        self.wiki_enabled = false;
        self.wiki_pages = 0;
        self
    }
}

pub fn project_json(project: &FakeProject) -> Value {
    let name = project.path.rsplit('/').next().unwrap_or_default();
    json!({
        "id": project.id,
        "name": name,
        "path": name,
        "path_with_namespace": project.path,
        "web_url": format!("https://gitlab.example.com/{}", project.path),
        "archived": false,
        "empty_repo": false,
        "wiki_enabled": project.wiki_enabled,
        "open_issues_count": 3,
        "created_at": "2022-01-01T00:00:00Z",
        "last_activity_at": "2024-06-01T12:00:00Z",
        "statistics": {
            "commit_count": 100,
            "repository_size": 5 * 1024 * 1024,
            "lfs_objects_size": 0
        }
    })
}

/// Register the base object and every sub-resource of `project`.
///
/// Each project has 2 tags, 3 members, 1 milestone, 1 release, 4 merge
/// requests (2 notes and 1 approval each) and 3 issues (1 note each).
pub fn with_project(fake: FakeTransport, project: &FakeProject) -> FakeTransport {
    let id = project.id;
    let merge_requests: Vec<Value> = (0..4)
        .map(|i| json!({"iid": i + 1, "user_notes_count": 2, "approved_by": [{"user": {"id": 9}}]}))
        .collect();

    fake.with_object(&format!("/projects/{}", id), project_json(project))
        .with_collection(&format!("/projects/{}/repository/branches", id), items(project.branches))
        .with_collection(&format!("/projects/{}/repository/tags", id), items(2))
        .with_collection(&format!("/projects/{}/members/all", id), items(3))
        .with_collection(&format!("/projects/{}/milestones", id), items(1))
        .with_collection(&format!("/projects/{}/releases", id), items(1))
        .with_collection(&format!("/projects/{}/merge_requests", id), merge_requests)
        .with_collection(
            &format!("/projects/{}/issues", id),
            items_with("user_notes_count", json!(1), 3),
        )
        .with_collection(&format!("/projects/{}/wikis", id), items(project.wiki_pages))
}

/// Global `/projects` listing plus every project's resources
pub fn fake_gitlab(projects: &[FakeProject]) -> FakeTransport {
    let listing: Vec<Value> = projects.iter().map(project_json).collect();
    projects
        .iter()
        .fold(FakeTransport::new().with_collection("/projects", listing), with_project)
}

/// Projects numbered 1..=count with two branches each
pub fn numbered_projects(count: u64) -> Vec<FakeProject> {
    (1..=count).map(|id| FakeProject::new(id, 2)).collect()
}

/// Records every reporter call in order
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub calls: Vec<String>,
}

impl ProgressReporter for RecordingProgress {
    fn start(&mut self, total: usize) {
        self.calls.push(format!("start:{}", total));
    }

    fn update(&mut self, current: usize) {
        self.calls.push(format!("update:{}", current));
    }

    fn finish(&mut self) {
        self.calls.push("finish".to_string());
    }
}
