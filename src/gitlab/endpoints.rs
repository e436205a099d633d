//! REST resource paths, relative to `/api/v4`

/// A project reference: numeric id, or `group/sub/project` path which must be
/// URL-encoded as a single path segment.
pub fn project(identifier: &str) -> String {
    format!("/projects/{}", encode_segment(identifier))
}

pub fn project_by_id(id: u64) -> String {
    format!("/projects/{}", id)
}

pub fn projects() -> String {
    "/projects".to_string()
}

pub fn group(path: &str) -> String {
    format!("/groups/{}", encode_segment(path))
}

pub fn group_projects(group_id: u64) -> String {
    format!("/groups/{}/projects", group_id)
}

pub fn branches(project_id: u64) -> String {
    format!("/projects/{}/repository/branches", project_id)
}

pub fn tags(project_id: u64) -> String {
    format!("/projects/{}/repository/tags", project_id)
}

/// Includes inherited (group) members
pub fn members(project_id: u64) -> String {
    format!("/projects/{}/members/all", project_id)
}

pub fn issues(project_id: u64) -> String {
    format!("/projects/{}/issues", project_id)
}

pub fn merge_requests(project_id: u64) -> String {
    format!("/projects/{}/merge_requests", project_id)
}

pub fn milestones(project_id: u64) -> String {
    format!("/projects/{}/milestones", project_id)
}

pub fn releases(project_id: u64) -> String {
    format!("/projects/{}/releases", project_id)
}

pub fn wikis(project_id: u64) -> String {
    format!("/projects/{}/wikis", project_id)
}

fn encode_segment(value: &str) -> String {
    urlencoding::encode(value.trim_matches('/')).into_owned()
}
