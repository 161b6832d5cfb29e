// Repository operations

use super::{search_envelope, Page};
use crate::github::GitHubClient;
use hubgate_core::{GitHubResult, ResultEnvelope};
use serde_json::{Map, Value};

pub struct RepositoryApi<'a> {
    client: &'a GitHubClient,
}

impl<'a> RepositoryApi<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Get a repository by owner and name.
    pub async fn get(&self, owner: &str, repo: &str) -> GitHubResult<Value> {
        let response = self
            .client
            .get(
                &["repos", owner, repo],
                &[],
                &format!("Failed to get repository {}/{}", owner, repo),
            )
            .await?;
        Ok(response.body)
    }

    /// Search repositories.
    pub async fn search(&self, query: &str, page: Page) -> GitHubResult<ResultEnvelope<Value>> {
        let mut params = vec![("q", query.to_string())];
        params.extend(page.query());

        let response = self
            .client
            .get(&["search", "repositories"], &params, "Repository search failed")
            .await?;
        search_envelope(response, page)
    }

    /// Create a repository for the authenticated user. Options are sent as-is.
    pub async fn create(&self, options: &Map<String, Value>) -> GitHubResult<Value> {
        let response = self
            .client
            .post(&["user", "repos"], options, "Failed to create repository")
            .await?;
        Ok(response.body)
    }

    /// Fork a repository, optionally into an organization.
    pub async fn fork(
        &self,
        owner: &str,
        repo: &str,
        organization: Option<&str>,
    ) -> GitHubResult<Value> {
        let mut body = Map::new();
        if let Some(organization) = organization.filter(|o| !o.is_empty()) {
            body.insert("organization".to_string(), Value::from(organization));
        }

        let response = self
            .client
            .post(
                &["repos", owner, repo, "forks"],
                &body,
                &format!("Failed to fork repository {}/{}", owner, repo),
            )
            .await?;
        Ok(response.body)
    }
}
