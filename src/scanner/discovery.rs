//! Repository discovery
//!
//! Produces the descriptor list for a scan from, in order of precedence, an
//! explicit project list, one or more namespaces, or the global listing. Any
//! failure here is fatal to the scan.

use crate::gitlab::endpoints;
use crate::gitlab::pagination::{fetch_object, fetch_page, query, PageRequest, MAX_PAGE_SIZE};
use crate::gitlab::project::{parse_group, parse_project, RepositoryDescriptor};
use crate::gitlab::transport::Transport;
use crate::scanner::error::ScannerError;
use crate::scanner::types::ScanOptions;
use std::collections::HashSet;

pub async fn discover_repositories(
    transport: &dyn Transport,
    options: &ScanOptions,
) -> Result<Vec<RepositoryDescriptor>, ScannerError> {
    let mut found = if !options.projects.is_empty() {
        explicit_projects(transport, &options.projects, options.max_projects).await?
    } else if !options.namespaces.is_empty() {
        namespace_projects(transport, options).await?
    } else {
        let filters = listing_filters(options, &[]);
        list_projects(transport, &endpoints::projects(), &filters, options.max_projects).await?
    };

    if let Some(cap) = options.max_projects {
        found.truncate(cap);
    }
    log::info!("Found {} projects to scan", found.len());
    Ok(found)
}

fn listing_filters(options: &ScanOptions, extra: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut filters = query(extra);
    filters.extend(query(&[("statistics", "true")]));
    if !options.include_archived {
        filters.extend(query(&[("archived", "false")]));
    }
    filters
}

async fn explicit_projects(
    transport: &dyn Transport,
    identifiers: &[String],
    cap: Option<usize>,
) -> Result<Vec<RepositoryDescriptor>, ScannerError> {
    let mut found = Vec::with_capacity(identifiers.len());
    let mut seen = HashSet::new();
    let statistics = query(&[("statistics", "true")]);

    for identifier in identifiers {
        if cap.is_some_and(|cap| found.len() >= cap) {
            break;
        }
        let raw = fetch_object(transport, &endpoints::project(identifier), &statistics)
            .await
            .map_err(|e| {
                ScannerError::discovery(format!("project '{}' could not be resolved", identifier), e)
            })?;
        let project = parse_project(&raw);
        if seen.insert(project.id) {
            found.push(project);
        }
    }
    Ok(found)
}

async fn namespace_projects(
    transport: &dyn Transport,
    options: &ScanOptions,
) -> Result<Vec<RepositoryDescriptor>, ScannerError> {
    let mut found: Vec<RepositoryDescriptor> = Vec::new();
    let mut seen = HashSet::new();
    let filters = listing_filters(options, &[("include_subgroups", "true")]);

    for namespace in &options.namespaces {
        let raw = fetch_object(transport, &endpoints::group(namespace), &[])
            .await
            .map_err(|e| {
                ScannerError::discovery(
                    format!("namespace '{}' could not be resolved", namespace),
                    e,
                )
            })?;
        let group = parse_group(&raw);
        if group.id == 0 {
            return Err(ScannerError::Discovery {
                message: format!("namespace '{}' did not resolve to a group id", namespace),
                source: None,
            });
        }
        log::debug!("Namespace '{}' resolved to group {}", namespace, group.id);

        // At most found.len() of this listing can be duplicates, so listing up
        // to the full cap always leaves enough new projects to reach it
        let projects = list_projects(
            transport,
            &endpoints::group_projects(group.id),
            &filters,
            options.max_projects,
        )
        .await?;
        for project in projects {
            if seen.insert(project.id) {
                found.push(project);
            }
        }
        if let Some(cap) = options.max_projects {
            if found.len() >= cap {
                found.truncate(cap);
                break;
            }
        }
    }
    Ok(found)
}

/// Page through a project listing until a short page or the cap
async fn list_projects(
    transport: &dyn Transport,
    path: &str,
    filters: &[(String, String)],
    cap: Option<usize>,
) -> Result<Vec<RepositoryDescriptor>, ScannerError> {
    let mut found = Vec::new();
    let mut request = PageRequest::first(MAX_PAGE_SIZE);

    loop {
        let page = fetch_page(transport, path, request, filters)
            .await
            .map_err(|e| {
                ScannerError::discovery(
                    format!("failed to list projects (page {})", request.page),
                    e,
                )
            })?;
        log::debug!("Page {} of {} returned {} projects", request.page, path, page.len());

        if page.is_empty() {
            break;
        }
        let last = page.is_last(request);
        found.extend(page.items.iter().map(parse_project));

        if let Some(cap) = cap {
            if found.len() >= cap {
                found.truncate(cap);
                break;
            }
        }
        if last {
            break;
        }
        request = request.next();
    }
    Ok(found)
}
