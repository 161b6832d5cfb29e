//! Typed tool arguments.
//!
//! Raw argument maps are decoded once into [`ToolArgs`]. Required fields are
//! checked first so a missing field is reported by name; unknown fields are
//! ignored, and tools that forward options to the backend keep everything
//! that is not an addressing key.

use super::registry::ToolName;
use crate::operations::{FileChange, IssueFilters, Page, PullFilters};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Argument decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgsError {
    #[error("Field '{0}' is required")]
    Missing(&'static str),

    #[error("Invalid arguments: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct PageArgs {
    #[serde(default, deserialize_with = "optional_number")]
    pub page: Option<u32>,
    #[serde(
        default,
        rename = "perPage",
        alias = "per_page",
        deserialize_with = "optional_number"
    )]
    pub per_page: Option<u32>,
}

impl PageArgs {
    pub fn page(&self) -> Page {
        Page::new(self.page, self.per_page)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchArgs {
    pub query: String,
    #[serde(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ForkArgs {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub organization: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileContentsArgs {
    pub owner: String,
    pub repo: String,
    pub path: String,
    #[serde(default)]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WriteFileArgs {
    pub owner: String,
    pub repo: String,
    pub path: String,
    pub content: String,
    pub message: String,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub sha: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PushFilesArgs {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub files: Vec<FileChange>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateBranchArgs {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub from_branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListBranchesArgs {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub protected: Option<bool>,
    #[serde(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchArgs {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListCommitsArgs {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitArgs {
    pub owner: String,
    pub repo: String,
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitCommentsArgs {
    pub owner: String,
    pub repo: String,
    pub sha: String,
    #[serde(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompareArgs {
    pub owner: String,
    pub repo: String,
    pub base: String,
    pub head: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitCommentArgs {
    pub owner: String,
    pub repo: String,
    pub sha: String,
    pub body: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default, deserialize_with = "optional_number")]
    pub position: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListIssuesArgs {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(flatten)]
    pub page: PageArgs,
}

impl ListIssuesArgs {
    pub fn filters(&self) -> IssueFilters {
        IssueFilters {
            state: self.state.clone(),
            sort: self.sort.clone(),
            direction: self.direction.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueArgs {
    pub owner: String,
    pub repo: String,
    #[serde(deserialize_with = "number")]
    pub issue_number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueCommentsArgs {
    pub owner: String,
    pub repo: String,
    #[serde(deserialize_with = "number")]
    pub issue_number: u64,
    #[serde(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueCommentArgs {
    pub owner: String,
    pub repo: String,
    #[serde(deserialize_with = "number")]
    pub issue_number: u64,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListPullsArgs {
    pub owner: String,
    pub repo: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub head: Option<String>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(flatten)]
    pub page: PageArgs,
}

impl ListPullsArgs {
    pub fn filters(&self) -> PullFilters {
        PullFilters {
            state: self.state.clone(),
            head: self.head.clone(),
            base: self.base.clone(),
            sort: self.sort.clone(),
            direction: self.direction.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullArgs {
    pub owner: String,
    pub repo: String,
    #[serde(deserialize_with = "number")]
    pub pull_number: u64,
}

/// A paged collection under one pull request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullListArgs {
    pub owner: String,
    pub repo: String,
    #[serde(deserialize_with = "number")]
    pub pull_number: u64,
    #[serde(flatten)]
    pub page: PageArgs,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdatePullBranchArgs {
    pub owner: String,
    pub repo: String,
    #[serde(deserialize_with = "number")]
    pub pull_number: u64,
    #[serde(default)]
    pub expected_head_sha: Option<String>,
}

/// Addressing arguments plus the options forwarded to the backend as the
/// request body.
#[derive(Debug, Clone, PartialEq)]
pub struct Forwarded<T> {
    pub target: T,
    pub options: Map<String, Value>,
}

/// Decoded arguments, one variant per tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolArgs {
    GetRepository(RepoRef),
    SearchRepositories(SearchArgs),
    CreateRepository(Map<String, Value>),
    ForkRepository(ForkArgs),
    GetFileContents(FileContentsArgs),
    CreateOrUpdateFile(WriteFileArgs),
    PushFiles(PushFilesArgs),
    CreateBranch(CreateBranchArgs),
    ListBranches(ListBranchesArgs),
    GetBranch(BranchArgs),
    GetBranchProtection(BranchArgs),
    ListCommits(ListCommitsArgs),
    GetCommit(CommitArgs),
    CompareCommits(CompareArgs),
    GetCommitComments(CommitCommentsArgs),
    AddCommitComment(CommitCommentArgs),
    ListIssues(ListIssuesArgs),
    GetIssue(IssueArgs),
    CreateIssue(Forwarded<RepoRef>),
    UpdateIssue(Forwarded<IssueArgs>),
    AddIssueComment(IssueCommentArgs),
    ListIssueComments(IssueCommentsArgs),
    ListPullRequests(ListPullsArgs),
    GetPullRequest(PullArgs),
    CreatePullRequest(Forwarded<RepoRef>),
    GetPullRequestFiles(PullListArgs),
    CreatePullRequestReview(Forwarded<PullArgs>),
    MergePullRequest(Forwarded<PullArgs>),
    GetPullRequestStatus(PullArgs),
    UpdatePullRequestBranch(UpdatePullBranchArgs),
    GetPullRequestComments(PullListArgs),
    GetPullRequestReviews(PullListArgs),
    SearchCode(SearchArgs),
    SearchIssues(SearchArgs),
    SearchUsers(SearchArgs),
}

const REPO_KEYS: &[&str] = &["owner", "repo"];
const ISSUE_KEYS: &[&str] = &["owner", "repo", "issue_number"];
const PULL_KEYS: &[&str] = &["owner", "repo", "pull_number"];

impl ToolArgs {
    /// Validate and decode the arguments for `tool`.
    pub fn parse(tool: ToolName, args: &Map<String, Value>) -> Result<Self, ArgsError> {
        check_required(tool.required(), args)?;

        Ok(match tool {
            ToolName::GetRepository => Self::GetRepository(decode(args)?),
            ToolName::SearchRepositories => Self::SearchRepositories(decode(args)?),
            ToolName::CreateRepository => Self::CreateRepository(args.clone()),
            ToolName::ForkRepository => Self::ForkRepository(decode(args)?),
            ToolName::GetFileContents => Self::GetFileContents(decode(args)?),
            ToolName::CreateOrUpdateFile => Self::CreateOrUpdateFile(decode(args)?),
            ToolName::PushFiles => Self::PushFiles(decode(args)?),
            ToolName::CreateBranch => Self::CreateBranch(decode(args)?),
            ToolName::ListBranches => Self::ListBranches(decode(args)?),
            ToolName::GetBranch => Self::GetBranch(decode(args)?),
            ToolName::GetBranchProtection => Self::GetBranchProtection(decode(args)?),
            ToolName::ListCommits => Self::ListCommits(decode(args)?),
            ToolName::GetCommit => Self::GetCommit(decode(args)?),
            ToolName::CompareCommits => Self::CompareCommits(decode(args)?),
            ToolName::GetCommitComments => Self::GetCommitComments(decode(args)?),
            ToolName::AddCommitComment => Self::AddCommitComment(decode(args)?),
            ToolName::ListIssues => Self::ListIssues(decode(args)?),
            ToolName::GetIssue => Self::GetIssue(decode(args)?),
            ToolName::CreateIssue => Self::CreateIssue(forwarded(args, REPO_KEYS)?),
            ToolName::UpdateIssue => Self::UpdateIssue(forwarded(args, ISSUE_KEYS)?),
            ToolName::AddIssueComment => Self::AddIssueComment(decode(args)?),
            ToolName::ListIssueComments => Self::ListIssueComments(decode(args)?),
            ToolName::ListPullRequests => Self::ListPullRequests(decode(args)?),
            ToolName::GetPullRequest => Self::GetPullRequest(decode(args)?),
            ToolName::CreatePullRequest => Self::CreatePullRequest(forwarded(args, REPO_KEYS)?),
            ToolName::GetPullRequestFiles => Self::GetPullRequestFiles(decode(args)?),
            ToolName::CreatePullRequestReview => {
                Self::CreatePullRequestReview(forwarded(args, PULL_KEYS)?)
            }
            ToolName::MergePullRequest => Self::MergePullRequest(forwarded(args, PULL_KEYS)?),
            ToolName::GetPullRequestStatus => Self::GetPullRequestStatus(decode(args)?),
            ToolName::UpdatePullRequestBranch => Self::UpdatePullRequestBranch(decode(args)?),
            ToolName::GetPullRequestComments => Self::GetPullRequestComments(decode(args)?),
            ToolName::GetPullRequestReviews => Self::GetPullRequestReviews(decode(args)?),
            ToolName::SearchCode => Self::SearchCode(decode(args)?),
            ToolName::SearchIssues => Self::SearchIssues(decode(args)?),
            ToolName::SearchUsers => Self::SearchUsers(decode(args)?),
        })
    }
}

/// A required field must be present, non-null and, for strings, non-empty.
fn check_required(required: &[&'static str], args: &Map<String, Value>) -> Result<(), ArgsError> {
    for &field in required {
        match args.get(field) {
            None | Some(Value::Null) => return Err(ArgsError::Missing(field)),
            Some(Value::String(s)) if s.trim().is_empty() => return Err(ArgsError::Missing(field)),
            Some(_) => {}
        }
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(args: &Map<String, Value>) -> Result<T, ArgsError> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| ArgsError::Invalid(e.to_string()))
}

fn forwarded<T: DeserializeOwned>(
    args: &Map<String, Value>,
    addressing: &[&str],
) -> Result<Forwarded<T>, ArgsError> {
    let target = decode(args)?;
    let mut options = args.clone();
    for key in addressing {
        options.remove(*key);
    }
    Ok(Forwarded { target, options })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

impl NumberOrString {
    fn into_number<T: TryFrom<u64>, E: serde::de::Error>(self) -> Result<T, E> {
        let n = match self {
            Self::Number(n) => n,
            Self::String(s) => s
                .trim()
                .parse::<u64>()
                .map_err(|_| E::custom(format!("expected a number, got \"{}\"", s)))?,
        };
        T::try_from(n).map_err(|_| E::custom(format!("number {} is out of range", n)))
    }
}

/// Accept `42` or `"42"`.
fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    NumberOrString::deserialize(deserializer)
        .map_err(|_| D::Error::custom("expected a non-negative integer"))?
        .into_number()
}

fn optional_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    match Option::<NumberOrString>::deserialize(deserializer)
        .map_err(|_| D::Error::custom("expected a non-negative integer"))?
    {
        Some(value) => value.into_number().map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_missing_required_field_is_named() {
        let err = ToolArgs::parse(ToolName::GetRepository, &map(json!({ "owner": "a" })))
            .unwrap_err();
        assert_eq!(err, ArgsError::Missing("repo"));
        assert_eq!(err.to_string(), "Field 'repo' is required");
    }

    #[test]
    fn test_empty_and_null_count_as_missing() {
        let empty = ToolArgs::parse(
            ToolName::GetRepository,
            &map(json!({ "owner": "", "repo": "b" })),
        );
        assert_eq!(empty.unwrap_err(), ArgsError::Missing("owner"));

        let null = ToolArgs::parse(
            ToolName::GetRepository,
            &map(json!({ "owner": "a", "repo": null })),
        );
        assert_eq!(null.unwrap_err(), ArgsError::Missing("repo"));
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let args = ToolArgs::parse(
            ToolName::GetRepository,
            &map(json!({ "owner": "a", "repo": "b", "verbose": true })),
        )
        .unwrap();

        assert_eq!(
            args,
            ToolArgs::GetRepository(RepoRef {
                owner: "a".to_string(),
                repo: "b".to_string()
            })
        );
    }

    #[test]
    fn test_page_defaults_and_alias() {
        let ToolArgs::ListCommits(defaults) =
            ToolArgs::parse(ToolName::ListCommits, &map(json!({ "owner": "a", "repo": "b" })))
                .unwrap()
        else {
            panic!("wrong variant");
        };
        assert_eq!(defaults.page.page(), Page::default());

        let ToolArgs::SearchCode(search) = ToolArgs::parse(
            ToolName::SearchCode,
            &map(json!({ "query": "fn", "per_page": 5, "page": "2" })),
        )
        .unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(search.page.page(), Page::new(Some(2), Some(5)));
    }

    #[test]
    fn test_comment_lists_take_page_options() {
        let ToolArgs::ListIssueComments(comments) = ToolArgs::parse(
            ToolName::ListIssueComments,
            &map(json!({ "owner": "a", "repo": "b", "issue_number": "4", "perPage": 10 })),
        )
        .unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(comments.issue_number, 4);
        assert_eq!(comments.page.page(), Page::new(None, Some(10)));

        let ToolArgs::GetPullRequestReviews(reviews) = ToolArgs::parse(
            ToolName::GetPullRequestReviews,
            &map(json!({ "owner": "a", "repo": "b", "pull_number": 7 })),
        )
        .unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(reviews.page.page(), Page::default());
    }

    #[test]
    fn test_issue_number_accepts_strings() {
        let ToolArgs::GetIssue(issue) = ToolArgs::parse(
            ToolName::GetIssue,
            &map(json!({ "owner": "a", "repo": "b", "issue_number": "42" })),
        )
        .unwrap() else {
            panic!("wrong variant");
        };
        assert_eq!(issue.issue_number, 42);

        let err = ToolArgs::parse(
            ToolName::GetIssue,
            &map(json!({ "owner": "a", "repo": "b", "issue_number": "forty" })),
        )
        .unwrap_err();
        assert!(matches!(err, ArgsError::Invalid(_)));
    }

    #[test]
    fn test_forwarded_options_drop_addressing_keys() {
        let ToolArgs::UpdateIssue(update) = ToolArgs::parse(
            ToolName::UpdateIssue,
            &map(json!({
                "owner": "a",
                "repo": "b",
                "issue_number": 3,
                "state": "closed",
                "labels": ["bug"]
            })),
        )
        .unwrap() else {
            panic!("wrong variant");
        };

        assert_eq!(update.target.issue_number, 3);
        assert_eq!(
            Value::Object(update.options),
            json!({ "state": "closed", "labels": ["bug"] })
        );
    }

    #[test]
    fn test_create_pull_request_keeps_title_in_body() {
        let ToolArgs::CreatePullRequest(create) = ToolArgs::parse(
            ToolName::CreatePullRequest,
            &map(json!({
                "owner": "a",
                "repo": "b",
                "title": "t",
                "head": "feature",
                "base": "main",
                "draft": true
            })),
        )
        .unwrap() else {
            panic!("wrong variant");
        };

        assert_eq!(create.target.owner, "a");
        assert_eq!(
            Value::Object(create.options),
            json!({ "title": "t", "head": "feature", "base": "main", "draft": true })
        );
    }

    #[test]
    fn test_push_files_requires_file_entries() {
        let err = ToolArgs::parse(
            ToolName::PushFiles,
            &map(json!({
                "owner": "a",
                "repo": "b",
                "branch": "main",
                "message": "m",
                "files": [{ "path": "x" }]
            })),
        )
        .unwrap_err();

        assert!(matches!(err, ArgsError::Invalid(_)));
    }
}
