// Pull request operations

use super::files::string_field;
use super::{list_envelope, push_param, Page};
use crate::github::GitHubClient;
use hubgate_core::{GitHubResult, ResultEnvelope};
use serde_json::{Map, Value};
use tracing::debug;

/// Filters for [`PullsApi::list`]. Empty values are not sent.
#[derive(Debug, Clone, Default)]
pub struct PullFilters {
    pub state: Option<String>,
    pub head: Option<String>,
    pub base: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

pub struct PullsApi<'a> {
    client: &'a GitHubClient,
}

impl<'a> PullsApi<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        owner: &str,
        repo: &str,
        filters: &PullFilters,
        page: Page,
    ) -> GitHubResult<ResultEnvelope<Value>> {
        let mut query = page.query();
        push_param(&mut query, "state", filters.state.as_deref());
        push_param(&mut query, "head", filters.head.as_deref());
        push_param(&mut query, "base", filters.base.as_deref());
        push_param(&mut query, "sort", filters.sort.as_deref());
        push_param(&mut query, "direction", filters.direction.as_deref());

        let response = self
            .client
            .get(
                &["repos", owner, repo, "pulls"],
                &query,
                &format!("Failed to list pull requests for {}/{}", owner, repo),
            )
            .await?;
        list_envelope(response, page)
    }

    pub async fn get(&self, owner: &str, repo: &str, number: u64) -> GitHubResult<Value> {
        self.read(owner, repo, number, None, &format!("Failed to get pull request #{}", number))
            .await
    }

    /// Open a pull request. `options` carries title, head, base and any
    /// other fields GitHub accepts.
    pub async fn create(
        &self,
        owner: &str,
        repo: &str,
        options: &Map<String, Value>,
    ) -> GitHubResult<Value> {
        let response = self
            .client
            .post(
                &["repos", owner, repo, "pulls"],
                options,
                "Failed to create pull request",
            )
            .await?;
        Ok(response.body)
    }

    pub async fn files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        page: Page,
    ) -> GitHubResult<ResultEnvelope<Value>> {
        self.list_of(
            owner,
            repo,
            number,
            "files",
            page,
            &format!("Failed to get files for PR #{}", number),
        )
        .await
    }

    pub async fn reviews(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        page: Page,
    ) -> GitHubResult<ResultEnvelope<Value>> {
        self.list_of(
            owner,
            repo,
            number,
            "reviews",
            page,
            &format!("Failed to get reviews for PR #{}", number),
        )
        .await
    }

    /// Review comments on the diff.
    pub async fn comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        page: Page,
    ) -> GitHubResult<ResultEnvelope<Value>> {
        self.list_of(
            owner,
            repo,
            number,
            "comments",
            page,
            &format!("Failed to get comments for PR #{}", number),
        )
        .await
    }

    pub async fn create_review(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        options: &Map<String, Value>,
    ) -> GitHubResult<Value> {
        let number = number.to_string();
        let response = self
            .client
            .post(
                &["repos", owner, repo, "pulls", number.as_str(), "reviews"],
                options,
                &format!("Failed to create review for PR #{}", number),
            )
            .await?;
        Ok(response.body)
    }

    /// Combined commit status of the pull request head.
    pub async fn status(&self, owner: &str, repo: &str, number: u64) -> GitHubResult<Value> {
        let pull = self
            .read(owner, repo, number, None, &format!("Failed to get PR #{}", number))
            .await?;
        let sha = string_field(&pull, &["head", "sha"], "pull request head sha")?;
        debug!(pull = number, sha = %sha, "Reading combined status");

        let response = self
            .client
            .get(
                &["repos", owner, repo, "commits", sha.as_str(), "status"],
                &[],
                &format!("Failed to get status for PR #{}", number),
            )
            .await?;
        Ok(response.body)
    }

    pub async fn merge(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        options: &Map<String, Value>,
    ) -> GitHubResult<Value> {
        let number = number.to_string();
        let response = self
            .client
            .put(
                &["repos", owner, repo, "pulls", number.as_str(), "merge"],
                options,
                &format!("Failed to merge PR #{}", number),
            )
            .await?;
        Ok(response.body)
    }

    /// Bring the head branch up to date with its base.
    pub async fn update_branch(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        expected_head_sha: Option<&str>,
    ) -> GitHubResult<Value> {
        let mut body = Map::new();
        if let Some(sha) = expected_head_sha.filter(|s| !s.is_empty()) {
            body.insert("expected_head_sha".to_string(), Value::from(sha));
        }

        let number = number.to_string();
        let response = self
            .client
            .put(
                &["repos", owner, repo, "pulls", number.as_str(), "update-branch"],
                &body,
                &format!("Failed to update branch for PR #{}", number),
            )
            .await?;
        Ok(response.body)
    }

    async fn read(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        resource: Option<&str>,
        error_message: &str,
    ) -> GitHubResult<Value> {
        let number = number.to_string();
        let mut segments = vec!["repos", owner, repo, "pulls", number.as_str()];
        segments.extend(resource);

        let response = self.client.get(&segments, &[], error_message).await?;
        Ok(response.body)
    }

    /// A paged collection under one pull request.
    async fn list_of(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        resource: &str,
        page: Page,
        error_message: &str,
    ) -> GitHubResult<ResultEnvelope<Value>> {
        let number = number.to_string();
        let response = self
            .client
            .get(
                &["repos", owner, repo, "pulls", number.as_str(), resource],
                &page.query(),
                error_message,
            )
            .await?;
        list_envelope(response, page)
    }
}
