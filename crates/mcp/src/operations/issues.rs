// Issue operations

use super::{list_envelope, push_param, Page};
use crate::github::GitHubClient;
use hubgate_core::{GitHubResult, ResultEnvelope};
use serde_json::{json, Map, Value};

/// Filters for [`IssuesApi::list`]. Empty values are not sent.
#[derive(Debug, Clone, Default)]
pub struct IssueFilters {
    pub state: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

pub struct IssuesApi<'a> {
    client: &'a GitHubClient,
}

impl<'a> IssuesApi<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        owner: &str,
        repo: &str,
        filters: &IssueFilters,
        page: Page,
    ) -> GitHubResult<ResultEnvelope<Value>> {
        let mut query = page.query();
        push_param(&mut query, "state", filters.state.as_deref());
        push_param(&mut query, "sort", filters.sort.as_deref());
        push_param(&mut query, "direction", filters.direction.as_deref());

        let response = self
            .client
            .get(
                &["repos", owner, repo, "issues"],
                &query,
                &format!("Failed to list issues for {}/{}", owner, repo),
            )
            .await?;
        list_envelope(response, page)
    }

    pub async fn get(&self, owner: &str, repo: &str, number: u64) -> GitHubResult<Value> {
        let number = number.to_string();
        let response = self
            .client
            .get(
                &["repos", owner, repo, "issues", number.as_str()],
                &[],
                &format!("Failed to get issue #{}", number),
            )
            .await?;
        Ok(response.body)
    }

    /// Create an issue. `options` is the request body (title, body, labels...).
    pub async fn create(
        &self,
        owner: &str,
        repo: &str,
        options: &Map<String, Value>,
    ) -> GitHubResult<Value> {
        let response = self
            .client
            .post(
                &["repos", owner, repo, "issues"],
                options,
                "Failed to create issue",
            )
            .await?;
        Ok(response.body)
    }

    pub async fn update(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        options: &Map<String, Value>,
    ) -> GitHubResult<Value> {
        let number = number.to_string();
        let response = self
            .client
            .patch(
                &["repos", owner, repo, "issues", number.as_str()],
                options,
                &format!("Failed to update issue #{}", number),
            )
            .await?;
        Ok(response.body)
    }

    pub async fn add_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> GitHubResult<Value> {
        let number = number.to_string();
        let response = self
            .client
            .post(
                &["repos", owner, repo, "issues", number.as_str(), "comments"],
                &json!({ "body": body }),
                &format!("Failed to add comment to issue #{}", number),
            )
            .await?;
        Ok(response.body)
    }

    pub async fn list_comments(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        page: Page,
    ) -> GitHubResult<ResultEnvelope<Value>> {
        let number = number.to_string();
        let response = self
            .client
            .get(
                &["repos", owner, repo, "issues", number.as_str(), "comments"],
                &page.query(),
                &format!("Failed to list comments for issue #{}", number),
            )
            .await?;
        list_envelope(response, page)
    }
}
