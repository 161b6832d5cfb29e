// Branch operations

use super::files::string_field;
use super::{list_envelope, path_segments, Page};
use crate::github::GitHubClient;
use hubgate_core::{GitHubResult, ResultEnvelope};
use serde::Serialize;
use serde_json::{json, Value};

/// Result of [`BranchesApi::create_from_ref`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedBranch {
    pub name: String,
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: String,
    pub from_branch: String,
    pub url: Option<String>,
}

pub struct BranchesApi<'a> {
    client: &'a GitHubClient,
}

impl<'a> BranchesApi<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// List branches, optionally only protected (or unprotected) ones.
    pub async fn list(
        &self,
        owner: &str,
        repo: &str,
        protected: Option<bool>,
        page: Page,
    ) -> GitHubResult<ResultEnvelope<Value>> {
        let mut query = page.query();
        if let Some(protected) = protected {
            query.push(("protected", protected.to_string()));
        }

        let response = self
            .client
            .get(
                &["repos", owner, repo, "branches"],
                &query,
                &format!("Failed to list branches for {}/{}", owner, repo),
            )
            .await?;
        list_envelope(response, page)
    }

    pub async fn get(&self, owner: &str, repo: &str, branch: &str) -> GitHubResult<Value> {
        let mut segments = vec!["repos", owner, repo, "branches"];
        segments.extend(path_segments(branch));

        let response = self
            .client
            .get(&segments, &[], &format!("Failed to get branch {}", branch))
            .await?;
        Ok(response.body)
    }

    pub async fn protection(&self, owner: &str, repo: &str, branch: &str) -> GitHubResult<Value> {
        let mut segments = vec!["repos", owner, repo, "branches"];
        segments.extend(path_segments(branch));
        segments.push("protection");

        let response = self
            .client
            .get(
                &segments,
                &[],
                &format!("Failed to get protection for branch {}", branch),
            )
            .await?;
        Ok(response.body)
    }

    /// Create `branch` pointing at the current head of `from_branch`.
    pub async fn create_from_ref(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        from_branch: &str,
    ) -> GitHubResult<CreatedBranch> {
        let mut source = vec!["repos", owner, repo, "git", "refs", "heads"];
        source.extend(path_segments(from_branch));

        let source_ref = self
            .client
            .get(
                &source,
                &[],
                &format!("Failed to get reference for branch {}", from_branch),
            )
            .await?
            .body;
        let sha = string_field(&source_ref, &["object", "sha"], "ref object sha")?;

        let git_ref = format!("refs/heads/{}", branch);
        let created = self
            .client
            .post(
                &["repos", owner, repo, "git", "refs"],
                &json!({ "ref": git_ref, "sha": sha }),
                &format!("Failed to create branch {}", branch),
            )
            .await?
            .body;

        Ok(CreatedBranch {
            name: branch.to_string(),
            git_ref,
            sha,
            from_branch: from_branch.to_string(),
            url: created.get("url").and_then(Value::as_str).map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::operations::test_support::create_client;
    use crate::operations::Page;
    use hubgate_core::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_branch_from_ref() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/a/b/git/refs/heads/main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": { "sha": "abc123" }
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/repos/a/b/git/refs"))
            .and(body_json(json!({ "ref": "refs/heads/feature", "sha": "abc123" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "url": "https://api.github.com/repos/a/b/git/refs/heads/feature"
            })))
            .mount(&server)
            .await;

        let client = create_client(&server.uri());
        let created = client
            .branches()
            .create_from_ref("a", "b", "feature", "main")
            .await
            .unwrap();

        let value = serde_json::to_value(&created).unwrap();
        assert_eq!(value["ref"], "refs/heads/feature");
        assert_eq!(value["sha"], "abc123");
        assert_eq!(value["from_branch"], "main");
        assert_eq!(
            value["url"],
            "https://api.github.com/repos/a/b/git/refs/heads/feature"
        );
    }

    #[tokio::test]
    async fn test_create_branch_conflict() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/a/b/git/refs/heads/main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": { "sha": "abc123" }
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/repos/a/b/git/refs"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "message": "Reference already exists"
            })))
            .mount(&server)
            .await;

        let client = create_client(&server.uri());
        let err = client
            .branches()
            .create_from_ref("a", "b", "feature", "main")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConflictError);
    }

    #[tokio::test]
    async fn test_list_protected_branches() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/a/b/branches"))
            .and(query_param("protected", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "name": "main" }])))
            .mount(&server)
            .await;

        let client = create_client(&server.uri());
        let branches = client
            .branches()
            .list("a", "b", Some(true), Page::default())
            .await
            .unwrap();

        assert_eq!(branches.items[0]["name"], "main");
        assert_eq!(branches.pagination.page, 1);
    }
}
