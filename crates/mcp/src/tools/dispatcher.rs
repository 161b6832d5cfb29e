//! Tool dispatch.
//!
//! Resolves a tool call by exact name, decodes its arguments into
//! [`ToolArgs`], runs the matching adapter operation and wraps the result in
//! a single pretty-printed text block. Dispatch holds no per-call state, so
//! one dispatcher serves any number of concurrent calls.

use super::args::{ArgsError, ToolArgs};
use super::registry::{ToolName, ToolRegistry};
use crate::github::GitHubClient;
use crate::operations::{FileWrite, SearchKind};
use crate::protocol::{CallToolParams, CallToolResult, ToolSchema};
use hubgate_core::{ErrorEnvelope, ErrorKind, GitHubError, GitHubResult};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ToolError {
    #[error("Tool name is required")]
    MissingName,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("{message}")]
    InvalidArguments { tool: String, message: String },

    #[error(transparent)]
    Operation(#[from] GitHubError),
}

impl ToolError {
    /// Rejected before any backend call was made.
    pub fn is_request_error(&self) -> bool {
        !matches!(self, ToolError::Operation(_))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::Operation(e) => e.kind(),
            _ => ErrorKind::ValidationError,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            ToolError::Operation(e) => e.envelope(),
            other => GitHubError::validation(other.to_string()).envelope(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolDispatcher {
    client: GitHubClient,
    registry: ToolRegistry,
}

impl ToolDispatcher {
    pub fn new(client: GitHubClient) -> Self {
        Self {
            client,
            registry: ToolRegistry::new(),
        }
    }

    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    pub fn tools(&self) -> &[ToolSchema] {
        self.registry.list_schemas()
    }

    pub async fn dispatch(&self, params: CallToolParams) -> Result<CallToolResult, ToolError> {
        let name = params
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or(ToolError::MissingName)?;
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let arguments = match params.arguments {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(arguments)) => arguments,
            Some(_) => {
                return Err(ToolError::InvalidArguments {
                    tool: tool.to_string(),
                    message: "Arguments must be an object".to_string(),
                })
            }
        };

        let args = ToolArgs::parse(tool, &arguments).map_err(|e: ArgsError| {
            debug!(tool = %tool, error = %e, "Rejected tool arguments");
            ToolError::InvalidArguments {
                tool: tool.to_string(),
                message: e.to_string(),
            }
        })?;

        info!(tool = %tool, "Calling tool");
        let value = self.execute(args).await.inspect_err(|e| {
            debug!(tool = %tool, kind = %e.kind(), error = %e, "Tool call failed");
        })?;

        let text = serde_json::to_string_pretty(&value).map_err(|e| {
            error!(tool = %tool, error = %e, "Failed to render tool result");
            GitHubError::server(format!("Failed to render result: {}", e))
        })?;

        Ok(CallToolResult::text(text))
    }

    /// Look up a tool without calling it.
    pub fn resolve(&self, name: &str) -> Option<ToolName> {
        self.registry.get(name)
    }

    async fn execute(&self, args: ToolArgs) -> GitHubResult<Value> {
        let github = &self.client;

        match args {
            ToolArgs::GetRepository(a) => github.repositories().get(&a.owner, &a.repo).await,
            ToolArgs::SearchRepositories(a) => {
                to_json(github.repositories().search(&a.query, a.page.page()).await?)
            }
            ToolArgs::CreateRepository(options) => github.repositories().create(&options).await,
            ToolArgs::ForkRepository(a) => {
                github
                    .repositories()
                    .fork(&a.owner, &a.repo, a.organization.as_deref())
                    .await
            }

            ToolArgs::GetFileContents(a) => {
                github
                    .files()
                    .get_contents(&a.owner, &a.repo, &a.path, a.branch.as_deref())
                    .await
            }
            ToolArgs::CreateOrUpdateFile(a) => {
                let write = FileWrite {
                    path: a.path,
                    content: a.content,
                    message: a.message,
                    branch: a.branch,
                    sha: a.sha,
                };
                github.files().create_or_update(&a.owner, &a.repo, &write).await
            }
            ToolArgs::PushFiles(a) => to_json(
                github
                    .files()
                    .push_files(&a.owner, &a.repo, &a.branch, &a.files, &a.message)
                    .await?,
            ),

            ToolArgs::CreateBranch(a) => to_json(
                github
                    .branches()
                    .create_from_ref(&a.owner, &a.repo, &a.branch, &a.from_branch)
                    .await?,
            ),
            ToolArgs::ListBranches(a) => to_json(
                github
                    .branches()
                    .list(&a.owner, &a.repo, a.protected, a.page.page())
                    .await?,
            ),
            ToolArgs::GetBranch(a) => github.branches().get(&a.owner, &a.repo, &a.branch).await,
            ToolArgs::GetBranchProtection(a) => {
                github.branches().protection(&a.owner, &a.repo, &a.branch).await
            }

            ToolArgs::ListCommits(a) => to_json(
                github
                    .commits()
                    .list(&a.owner, &a.repo, a.sha.as_deref(), a.page.page())
                    .await?,
            ),
            ToolArgs::GetCommit(a) => github.commits().get(&a.owner, &a.repo, &a.sha).await,
            ToolArgs::CompareCommits(a) => {
                github
                    .commits()
                    .compare(&a.owner, &a.repo, &a.base, &a.head)
                    .await
            }
            ToolArgs::GetCommitComments(a) => to_json(
                github
                    .commits()
                    .comments(&a.owner, &a.repo, &a.sha, a.page.page())
                    .await?,
            ),
            ToolArgs::AddCommitComment(a) => {
                github
                    .commits()
                    .add_comment(&a.owner, &a.repo, &a.sha, &a.body, a.path.as_deref(), a.position)
                    .await
            }

            ToolArgs::ListIssues(a) => to_json(
                github
                    .issues()
                    .list(&a.owner, &a.repo, &a.filters(), a.page.page())
                    .await?,
            ),
            ToolArgs::GetIssue(a) => github.issues().get(&a.owner, &a.repo, a.issue_number).await,
            ToolArgs::CreateIssue(f) => {
                github
                    .issues()
                    .create(&f.target.owner, &f.target.repo, &f.options)
                    .await
            }
            ToolArgs::UpdateIssue(f) => {
                let t = &f.target;
                github
                    .issues()
                    .update(&t.owner, &t.repo, t.issue_number, &f.options)
                    .await
            }
            ToolArgs::AddIssueComment(a) => {
                github
                    .issues()
                    .add_comment(&a.owner, &a.repo, a.issue_number, &a.body)
                    .await
            }
            ToolArgs::ListIssueComments(a) => to_json(
                github
                    .issues()
                    .list_comments(&a.owner, &a.repo, a.issue_number, a.page.page())
                    .await?,
            ),

            ToolArgs::ListPullRequests(a) => to_json(
                github
                    .pulls()
                    .list(&a.owner, &a.repo, &a.filters(), a.page.page())
                    .await?,
            ),
            ToolArgs::GetPullRequest(a) => github.pulls().get(&a.owner, &a.repo, a.pull_number).await,
            ToolArgs::CreatePullRequest(f) => {
                github
                    .pulls()
                    .create(&f.target.owner, &f.target.repo, &f.options)
                    .await
            }
            ToolArgs::GetPullRequestFiles(a) => to_json(
                github
                    .pulls()
                    .files(&a.owner, &a.repo, a.pull_number, a.page.page())
                    .await?,
            ),
            ToolArgs::CreatePullRequestReview(f) => {
                let t = &f.target;
                github
                    .pulls()
                    .create_review(&t.owner, &t.repo, t.pull_number, &f.options)
                    .await
            }
            ToolArgs::MergePullRequest(f) => {
                let t = &f.target;
                github
                    .pulls()
                    .merge(&t.owner, &t.repo, t.pull_number, &f.options)
                    .await
            }
            ToolArgs::GetPullRequestStatus(a) => {
                github.pulls().status(&a.owner, &a.repo, a.pull_number).await
            }
            ToolArgs::UpdatePullRequestBranch(a) => {
                github
                    .pulls()
                    .update_branch(&a.owner, &a.repo, a.pull_number, a.expected_head_sha.as_deref())
                    .await
            }
            ToolArgs::GetPullRequestComments(a) => to_json(
                github
                    .pulls()
                    .comments(&a.owner, &a.repo, a.pull_number, a.page.page())
                    .await?,
            ),
            ToolArgs::GetPullRequestReviews(a) => to_json(
                github
                    .pulls()
                    .reviews(&a.owner, &a.repo, a.pull_number, a.page.page())
                    .await?,
            ),

            ToolArgs::SearchCode(a) => search(github, SearchKind::Code, &a.query, a.page.page()).await,
            ToolArgs::SearchIssues(a) => {
                search(github, SearchKind::Issues, &a.query, a.page.page()).await
            }
            ToolArgs::SearchUsers(a) => search(github, SearchKind::Users, &a.query, a.page.page()).await,
        }
    }
}

async fn search(
    github: &GitHubClient,
    kind: SearchKind,
    query: &str,
    page: crate::operations::Page,
) -> GitHubResult<Value> {
    to_json(github.search().search(kind, query, page).await?)
}

fn to_json<T: Serialize>(value: T) -> GitHubResult<Value> {
    serde_json::to_value(value).map_err(|e| {
        error!(error = %e, "Failed to serialize adapter result");
        GitHubError::server(format!("Failed to serialize result: {}", e))
    })
}
