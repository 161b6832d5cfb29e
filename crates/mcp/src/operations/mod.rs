//! Remote resource adapters, one per resource family.
//!
//! Adapters are borrowed views over a [`GitHubClient`](crate::GitHubClient)
//! and return backend documents as JSON. List operations return a
//! [`ResultEnvelope`] with a uniform pagination descriptor.

mod branches;
mod commits;
mod files;
mod issues;
mod pulls;
mod repository;
mod search;

pub use branches::{BranchesApi, CreatedBranch};
pub use commits::CommitsApi;
pub use files::{FileChange, FilesApi, FileWrite, PushResult};
pub use issues::{IssueFilters, IssuesApi};
pub use pulls::{PullFilters, PullsApi};
pub use repository::RepositoryApi;
pub use search::{SearchApi, SearchKind};

use crate::github::ApiResponse;
use hubgate_core::pagination::{DEFAULT_PAGE, DEFAULT_PER_PAGE};
use hubgate_core::{GitHubError, GitHubResult, Pagination, ResultEnvelope};
use serde_json::Value;

/// Page selection for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE),
        }
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Wrap a JSON array response.
pub(crate) fn list_envelope(
    response: ApiResponse,
    page: Page,
) -> GitHubResult<ResultEnvelope<Value>> {
    let links = response.links();
    let items = match response.body {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            return Err(GitHubError::server(format!(
                "Expected a list response, got {}",
                json_type(&other)
            )))
        }
    };

    Ok(ResultEnvelope::new(
        items,
        Pagination::new(page.page, page.per_page).with_links(links),
    ))
}

/// Wrap a search response (`{total_count, items}`).
pub(crate) fn search_envelope(
    response: ApiResponse,
    page: Page,
) -> GitHubResult<ResultEnvelope<Value>> {
    let links = response.links();
    let total_count = response
        .body
        .get("total_count")
        .and_then(Value::as_u64)
        .unwrap_or(0);
    let items = match response.body.get("items") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };

    Ok(ResultEnvelope::new(
        items,
        Pagination::new(page.page, page.per_page)
            .with_total_count(total_count)
            .with_links(links),
    ))
}

/// Split a slash-separated path into URL segments.
pub(crate) fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

pub(crate) fn push_param(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        query.push((key, value.to_string()));
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::github::{GitHubClient, GitHubConfig};
    use url::Url;

    pub fn create_client(base_url: &str) -> GitHubClient {
        let config = GitHubConfig::new(Url::parse(base_url).unwrap(), "ghp_test");
        GitHubClient::new(config).unwrap()
    }
}
