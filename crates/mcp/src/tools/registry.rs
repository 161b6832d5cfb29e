// Tool catalog: names, descriptions and input schemas

use crate::protocol::ToolSchema;
use serde_json::{json, Map, Value};
use std::fmt;

/// Every tool the gateway exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    GetRepository,
    SearchRepositories,
    CreateRepository,
    ForkRepository,
    GetFileContents,
    CreateOrUpdateFile,
    PushFiles,
    CreateBranch,
    ListBranches,
    GetBranch,
    GetBranchProtection,
    ListCommits,
    GetCommit,
    CompareCommits,
    GetCommitComments,
    AddCommitComment,
    ListIssues,
    GetIssue,
    CreateIssue,
    UpdateIssue,
    AddIssueComment,
    ListIssueComments,
    ListPullRequests,
    GetPullRequest,
    CreatePullRequest,
    GetPullRequestFiles,
    CreatePullRequestReview,
    MergePullRequest,
    GetPullRequestStatus,
    UpdatePullRequestBranch,
    GetPullRequestComments,
    GetPullRequestReviews,
    SearchCode,
    SearchIssues,
    SearchUsers,
}

impl ToolName {
    /// Catalog order.
    pub const ALL: [ToolName; 35] = [
        ToolName::CreateOrUpdateFile,
        ToolName::SearchRepositories,
        ToolName::CreateRepository,
        ToolName::GetRepository,
        ToolName::ForkRepository,
        ToolName::GetFileContents,
        ToolName::PushFiles,
        ToolName::CreateIssue,
        ToolName::CreatePullRequest,
        ToolName::CreateBranch,
        ToolName::ListBranches,
        ToolName::GetBranch,
        ToolName::GetBranchProtection,
        ToolName::ListCommits,
        ToolName::GetCommit,
        ToolName::CompareCommits,
        ToolName::GetCommitComments,
        ToolName::AddCommitComment,
        ToolName::ListIssues,
        ToolName::UpdateIssue,
        ToolName::AddIssueComment,
        ToolName::ListIssueComments,
        ToolName::SearchCode,
        ToolName::SearchIssues,
        ToolName::SearchUsers,
        ToolName::GetIssue,
        ToolName::GetPullRequest,
        ToolName::ListPullRequests,
        ToolName::CreatePullRequestReview,
        ToolName::MergePullRequest,
        ToolName::GetPullRequestFiles,
        ToolName::GetPullRequestStatus,
        ToolName::UpdatePullRequestBranch,
        ToolName::GetPullRequestComments,
        ToolName::GetPullRequestReviews,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::GetRepository => "get_repository",
            ToolName::SearchRepositories => "search_repositories",
            ToolName::CreateRepository => "create_repository",
            ToolName::ForkRepository => "fork_repository",
            ToolName::GetFileContents => "get_file_contents",
            ToolName::CreateOrUpdateFile => "create_or_update_file",
            ToolName::PushFiles => "push_files",
            ToolName::CreateBranch => "create_branch",
            ToolName::ListBranches => "list_branches",
            ToolName::GetBranch => "get_branch",
            ToolName::GetBranchProtection => "get_branch_protection",
            ToolName::ListCommits => "list_commits",
            ToolName::GetCommit => "get_commit",
            ToolName::CompareCommits => "compare_commits",
            ToolName::GetCommitComments => "get_commit_comments",
            ToolName::AddCommitComment => "add_commit_comment",
            ToolName::ListIssues => "list_issues",
            ToolName::GetIssue => "get_issue",
            ToolName::CreateIssue => "create_issue",
            ToolName::UpdateIssue => "update_issue",
            ToolName::AddIssueComment => "add_issue_comment",
            ToolName::ListIssueComments => "list_issue_comments",
            ToolName::ListPullRequests => "list_pull_requests",
            ToolName::GetPullRequest => "get_pull_request",
            ToolName::CreatePullRequest => "create_pull_request",
            ToolName::GetPullRequestFiles => "get_pull_request_files",
            ToolName::CreatePullRequestReview => "create_pull_request_review",
            ToolName::MergePullRequest => "merge_pull_request",
            ToolName::GetPullRequestStatus => "get_pull_request_status",
            ToolName::UpdatePullRequestBranch => "update_pull_request_branch",
            ToolName::GetPullRequestComments => "get_pull_request_comments",
            ToolName::GetPullRequestReviews => "get_pull_request_reviews",
            ToolName::SearchCode => "search_code",
            ToolName::SearchIssues => "search_issues",
            ToolName::SearchUsers => "search_users",
        }
    }

    /// Exact-name lookup.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            ToolName::GetRepository => "Get details of a GitHub repository",
            ToolName::SearchRepositories => "Search for GitHub repositories",
            ToolName::CreateRepository => "Create a new GitHub repository in your account",
            ToolName::ForkRepository => {
                "Fork a GitHub repository to your account or specified organization"
            }
            ToolName::GetFileContents => {
                "Get the contents of a file or directory from a GitHub repository"
            }
            ToolName::CreateOrUpdateFile => "Create or update a single file in a GitHub repository",
            ToolName::PushFiles => "Push multiple files to a GitHub repository in a single commit",
            ToolName::CreateBranch => "Create a new branch in a GitHub repository",
            ToolName::ListBranches => "List branches in a GitHub repository",
            ToolName::GetBranch => "Get details of a branch in a GitHub repository",
            ToolName::GetBranchProtection => "Get the protection settings of a branch",
            ToolName::ListCommits => "Get list of commits of a branch in a GitHub repository",
            ToolName::GetCommit => "Get details of a specific commit",
            ToolName::CompareCommits => "Compare two commits, branches or tags",
            ToolName::GetCommitComments => "Get the comments on a commit",
            ToolName::AddCommitComment => "Add a comment to a commit",
            ToolName::ListIssues => "List issues in a GitHub repository with filtering options",
            ToolName::GetIssue => "Get details of a specific issue in a GitHub repository",
            ToolName::CreateIssue => "Create a new issue in a GitHub repository",
            ToolName::UpdateIssue => "Update an existing issue in a GitHub repository",
            ToolName::AddIssueComment => "Add a comment to an existing issue",
            ToolName::ListIssueComments => "List the comments on an issue",
            ToolName::ListPullRequests => "List and filter repository pull requests",
            ToolName::GetPullRequest => "Get details of a specific pull request",
            ToolName::CreatePullRequest => "Create a new pull request in a GitHub repository",
            ToolName::GetPullRequestFiles => "Get the list of files changed in a pull request",
            ToolName::CreatePullRequestReview => "Create a review on a pull request",
            ToolName::MergePullRequest => "Merge a pull request",
            ToolName::GetPullRequestStatus => {
                "Get the combined status of all status checks for a pull request"
            }
            ToolName::UpdatePullRequestBranch => {
                "Update a pull request branch with the latest changes from the base branch"
            }
            ToolName::GetPullRequestComments => "Get the review comments on a pull request",
            ToolName::GetPullRequestReviews => "Get the reviews on a pull request",
            ToolName::SearchCode => "Search for code across GitHub repositories",
            ToolName::SearchIssues => {
                "Search for issues and pull requests across GitHub repositories"
            }
            ToolName::SearchUsers => "Search for users on GitHub",
        }
    }

    /// Arguments that must be present and non-empty.
    pub fn required(&self) -> &'static [&'static str] {
        match self {
            ToolName::GetRepository | ToolName::ForkRepository | ToolName::ListBranches => {
                &["owner", "repo"]
            }
            ToolName::ListCommits | ToolName::ListIssues | ToolName::ListPullRequests => {
                &["owner", "repo"]
            }
            ToolName::SearchRepositories
            | ToolName::SearchCode
            | ToolName::SearchIssues
            | ToolName::SearchUsers => &["query"],
            ToolName::CreateRepository => &["name"],
            ToolName::GetFileContents => &["owner", "repo", "path"],
            ToolName::CreateOrUpdateFile => &["owner", "repo", "path", "content", "message"],
            ToolName::PushFiles => &["owner", "repo", "branch", "files", "message"],
            ToolName::CreateBranch => &["owner", "repo", "branch", "from_branch"],
            ToolName::GetBranch | ToolName::GetBranchProtection => &["owner", "repo", "branch"],
            ToolName::GetCommit | ToolName::GetCommitComments => &["owner", "repo", "sha"],
            ToolName::CompareCommits => &["owner", "repo", "base", "head"],
            ToolName::AddCommitComment => &["owner", "repo", "sha", "body"],
            ToolName::GetIssue | ToolName::UpdateIssue | ToolName::ListIssueComments => {
                &["owner", "repo", "issue_number"]
            }
            ToolName::CreateIssue => &["owner", "repo", "title"],
            ToolName::AddIssueComment => &["owner", "repo", "issue_number", "body"],
            ToolName::CreatePullRequest => &["owner", "repo", "title", "head", "base"],
            ToolName::GetPullRequest
            | ToolName::GetPullRequestFiles
            | ToolName::CreatePullRequestReview
            | ToolName::MergePullRequest
            | ToolName::GetPullRequestStatus
            | ToolName::UpdatePullRequestBranch
            | ToolName::GetPullRequestComments
            | ToolName::GetPullRequestReviews => &["owner", "repo", "pull_number"],
        }
    }

    /// Documented optional arguments. Tools that forward options accept
    /// more than these.
    pub fn optional(&self) -> &'static [&'static str] {
        match self {
            ToolName::SearchRepositories
            | ToolName::SearchCode
            | ToolName::SearchIssues
            | ToolName::SearchUsers => &["page", "perPage"],
            ToolName::CreateRepository => &["description", "private", "autoInit"],
            ToolName::ForkRepository => &["organization"],
            ToolName::GetFileContents => &["branch"],
            ToolName::CreateOrUpdateFile => &["branch", "sha"],
            ToolName::ListBranches => &["protected", "page", "perPage"],
            ToolName::ListCommits => &["sha", "page", "perPage"],
            ToolName::GetCommitComments
            | ToolName::ListIssueComments
            | ToolName::GetPullRequestFiles
            | ToolName::GetPullRequestComments
            | ToolName::GetPullRequestReviews => &["page", "perPage"],
            ToolName::AddCommitComment => &["path", "position"],
            ToolName::ListIssues => &["state", "sort", "direction", "page", "perPage"],
            ToolName::CreateIssue => &["body", "assignees", "labels", "milestone"],
            ToolName::UpdateIssue => &["title", "body", "state", "assignees", "labels", "milestone"],
            ToolName::ListPullRequests => {
                &["state", "head", "base", "sort", "direction", "page", "perPage"]
            }
            ToolName::CreatePullRequest => &["body", "draft", "maintainer_can_modify"],
            ToolName::CreatePullRequestReview => &["commit_id", "body", "event", "comments"],
            ToolName::MergePullRequest => &["commit_title", "commit_message", "merge_method"],
            ToolName::UpdatePullRequestBranch => &["expected_head_sha"],
            _ => &[],
        }
    }

    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for &field in self.required().iter().chain(self.optional()) {
            properties.insert(field.to_string(), property_schema(field));
        }
        json_schema_object(Value::Object(properties), self.required().to_vec())
    }

    pub fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.as_str().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn property_schema(field: &str) -> Value {
    match field {
        "owner" => json_schema_string("Repository owner (user or organization)"),
        "repo" => json_schema_string("Repository name"),
        "query" => json_schema_string("Search query"),
        "page" => json_schema_number("Page number (default 1)"),
        "perPage" => json_schema_number("Results per page (default 30)"),
        "name" => json_schema_string("Repository name"),
        "description" => json_schema_string("Repository description"),
        "private" => json_schema_boolean("Whether the repository is private"),
        "autoInit" => json_schema_boolean("Initialize with a README"),
        "organization" => json_schema_string("Organization to fork into"),
        "path" => json_schema_string("Path within the repository"),
        "branch" => json_schema_string("Branch name"),
        "from_branch" => json_schema_string("Branch to create the new branch from"),
        "content" => json_schema_string("File content"),
        "message" => json_schema_string("Commit message"),
        "sha" => json_schema_string("Commit or blob SHA"),
        "files" => json_schema_array(
            json_schema_object(
                json!({
                    "path": json_schema_string("File path"),
                    "content": json_schema_string("File content"),
                }),
                vec!["path", "content"],
            ),
            "Files to push",
        ),
        "protected" => json_schema_boolean("Only list protected branches"),
        "base" => json_schema_string("Base branch or commit"),
        "head" => json_schema_string("Head branch or commit"),
        "body" => json_schema_string("Text body"),
        "position" => json_schema_number("Line position in the diff"),
        "state" => json_schema_string("State filter or new state (open, closed, all)"),
        "sort" => json_schema_string("Sort field"),
        "direction" => json_schema_string("Sort direction (asc, desc)"),
        "issue_number" => json_schema_number("Issue number"),
        "pull_number" => json_schema_number("Pull request number"),
        "title" => json_schema_string("Title"),
        "assignees" => json_schema_array(json_schema_string("Login"), "Users to assign"),
        "labels" => json_schema_array(json_schema_string("Label name"), "Labels to apply"),
        "milestone" => json_schema_number("Milestone number"),
        "draft" => json_schema_boolean("Open as a draft pull request"),
        "maintainer_can_modify" => json_schema_boolean("Allow maintainers to push to the head branch"),
        "commit_id" => json_schema_string("Commit SHA to review"),
        "event" => json_schema_string("Review action (APPROVE, REQUEST_CHANGES, COMMENT)"),
        "comments" => json_schema_array(json!({ "type": "object" }), "Review comments"),
        "commit_title" => json_schema_string("Merge commit title"),
        "commit_message" => json_schema_string("Merge commit message"),
        "merge_method" => json_schema_string("Merge method (merge, squash, rebase)"),
        "expected_head_sha" => json_schema_string("Expected head SHA of the pull request"),
        other => json_schema_string(other),
    }
}

/// Immutable tool catalog.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolSchema>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: ToolName::ALL.iter().map(ToolName::schema).collect(),
        }
    }

    /// Resolve a tool name; no partial matching.
    pub fn get(&self, name: &str) -> Option<ToolName> {
        ToolName::from_name(name)
    }

    pub fn list_schemas(&self) -> &[ToolSchema] {
        &self.tools
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Helper functions for creating tool schemas

pub fn json_schema_object(properties: Value, required: Vec<&str>) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn json_schema_string(description: &str) -> Value {
    json!({
        "type": "string",
        "description": description
    })
}

pub fn json_schema_number(description: &str) -> Value {
    json!({
        "type": "number",
        "description": description
    })
}

pub fn json_schema_boolean(description: &str) -> Value {
    json!({
        "type": "boolean",
        "description": description
    })
}

pub fn json_schema_array(items: Value, description: &str) -> Value {
    json!({
        "type": "array",
        "items": items,
        "description": description
    })
}
