// Commit operations

use super::{list_envelope, push_param, Page};
use crate::github::GitHubClient;
use hubgate_core::{GitHubResult, ResultEnvelope};
use serde_json::{Map, Value};

pub struct CommitsApi<'a> {
    client: &'a GitHubClient,
}

impl<'a> CommitsApi<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// List commits, optionally starting from `sha` (a branch name or sha).
    pub async fn list(
        &self,
        owner: &str,
        repo: &str,
        sha: Option<&str>,
        page: Page,
    ) -> GitHubResult<ResultEnvelope<Value>> {
        let mut query = page.query();
        push_param(&mut query, "sha", sha);

        let response = self
            .client
            .get(
                &["repos", owner, repo, "commits"],
                &query,
                &format!("Failed to list commits for {}/{}", owner, repo),
            )
            .await?;
        list_envelope(response, page)
    }

    pub async fn get(&self, owner: &str, repo: &str, sha: &str) -> GitHubResult<Value> {
        let response = self
            .client
            .get(
                &["repos", owner, repo, "commits", sha],
                &[],
                &format!("Failed to get commit {}", sha),
            )
            .await?;
        Ok(response.body)
    }

    /// Compare two commits, branches or tags.
    pub async fn compare(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> GitHubResult<Value> {
        let range = format!("{}...{}", base, head);
        let response = self
            .client
            .get(
                &["repos", owner, repo, "compare", range.as_str()],
                &[],
                &format!("Failed to compare {}", range),
            )
            .await?;
        Ok(response.body)
    }

    pub async fn comments(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        page: Page,
    ) -> GitHubResult<ResultEnvelope<Value>> {
        let response = self
            .client
            .get(
                &["repos", owner, repo, "commits", sha, "comments"],
                &page.query(),
                &format!("Failed to get comments for commit {}", sha),
            )
            .await?;
        list_envelope(response, page)
    }

    /// Comment on a commit, optionally on a line of a file in its diff.
    pub async fn add_comment(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
        body: &str,
        path: Option<&str>,
        position: Option<u64>,
    ) -> GitHubResult<Value> {
        let mut payload = Map::new();
        payload.insert("body".to_string(), Value::from(body));
        if let Some(path) = path.filter(|p| !p.is_empty()) {
            payload.insert("path".to_string(), Value::from(path));
        }
        if let Some(position) = position {
            payload.insert("position".to_string(), Value::from(position));
        }

        let response = self
            .client
            .post(
                &["repos", owner, repo, "commits", sha, "comments"],
                &payload,
                &format!("Failed to comment on commit {}", sha),
            )
            .await?;
        Ok(response.body)
    }
}
