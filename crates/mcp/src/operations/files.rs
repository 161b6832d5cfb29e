// File content operations

use super::path_segments;
use crate::github::GitHubClient;
use hubgate_core::content::{decode_content, encode_content};
use hubgate_core::{GitHubError, GitHubResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Mode for regular (non-executable) files in a git tree.
const BLOB_MODE: &str = "100644";

/// One file in a multi-file push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub content: String,
}

/// A single-file create or update.
#[derive(Debug, Clone, Default)]
pub struct FileWrite {
    pub path: String,
    pub content: String,
    pub message: String,
    pub branch: Option<String>,
    /// Blob sha of the file being replaced; required by GitHub for updates.
    pub sha: Option<String>,
}

/// Outcome of [`FilesApi::push_files`].
#[derive(Debug, Clone, Serialize)]
pub struct PushResult {
    pub message: String,
    pub commit: Value,
    pub branch: String,
}

pub struct FilesApi<'a> {
    client: &'a GitHubClient,
}

impl<'a> FilesApi<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    /// Get a file or directory.
    ///
    /// Files gain a `decoded_content` field; directories come back as
    /// `{type: "directory", path, contents}`.
    pub async fn get_contents(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> GitHubResult<Value> {
        let mut segments = vec!["repos", owner, repo, "contents"];
        segments.extend(path_segments(path));

        let mut query = Vec::new();
        super::push_param(&mut query, "ref", branch);

        let response = self
            .client
            .get(
                &segments,
                &query,
                &format!("Failed to get file contents for {}", path),
            )
            .await?;

        Ok(match response.body {
            Value::Array(contents) => json!({
                "type": "directory",
                "path": path,
                "contents": contents,
            }),
            Value::Object(mut file) => {
                attach_decoded_content(&mut file);
                Value::Object(file)
            }
            other => other,
        })
    }

    /// Create or update a single file.
    pub async fn create_or_update(
        &self,
        owner: &str,
        repo: &str,
        write: &FileWrite,
    ) -> GitHubResult<Value> {
        let mut segments = vec!["repos", owner, repo, "contents"];
        segments.extend(path_segments(&write.path));

        let mut body = Map::new();
        body.insert("message".to_string(), Value::from(write.message.as_str()));
        body.insert("content".to_string(), Value::from(encode_content(&write.content)));
        if let Some(branch) = write.branch.as_deref().filter(|b| !b.is_empty()) {
            body.insert("branch".to_string(), Value::from(branch));
        }
        if let Some(sha) = write.sha.as_deref().filter(|s| !s.is_empty()) {
            body.insert("sha".to_string(), Value::from(sha));
        }

        let response = self
            .client
            .put(
                &segments,
                &body,
                &format!("Failed to create/update file at {}", write.path),
            )
            .await?;
        Ok(response.body)
    }

    /// Push several files in one commit.
    ///
    /// Reads the branch ref and its commit, creates a tree and a commit on
    /// top of it, then moves the ref. The first failing step aborts the
    /// sequence; objects created before it stay unreferenced.
    pub async fn push_files(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        files: &[FileChange],
        message: &str,
    ) -> GitHubResult<PushResult> {
        let mut ref_segments = vec!["repos", owner, repo, "git", "refs", "heads"];
        ref_segments.extend(path_segments(branch));

        let git_ref = self
            .client
            .get(
                &ref_segments,
                &[],
                &format!("Failed to get ref for branch {}", branch),
            )
            .await?
            .body;
        let head_sha = string_field(&git_ref, &["object", "sha"], "ref object sha")?;
        debug!(branch = %branch, sha = %head_sha, "Resolved branch head");

        let commit = self
            .client
            .get(
                &["repos", owner, repo, "git", "commits", head_sha.as_str()],
                &[],
                "Failed to get commit",
            )
            .await?
            .body;
        let base_tree = string_field(&commit, &["tree", "sha"], "commit tree sha")?;
        let parent_sha = string_field(&commit, &["sha"], "commit sha")?;

        let entries: Vec<Value> = files
            .iter()
            .map(|file| {
                json!({
                    "path": file.path,
                    "mode": BLOB_MODE,
                    "type": "blob",
                    "content": file.content,
                })
            })
            .collect();

        let tree = self
            .client
            .post(
                &["repos", owner, repo, "git", "trees"],
                &json!({ "base_tree": base_tree, "tree": entries }),
                "Failed to create tree",
            )
            .await?
            .body;
        let tree_sha = string_field(&tree, &["sha"], "tree sha")?;

        let new_commit = self
            .client
            .post(
                &["repos", owner, repo, "git", "commits"],
                &json!({
                    "message": message,
                    "tree": tree_sha,
                    "parents": [parent_sha],
                }),
                "Failed to create commit",
            )
            .await?
            .body;
        let new_commit_sha = string_field(&new_commit, &["sha"], "new commit sha")?;
        debug!(sha = %new_commit_sha, "Created commit");

        self.client
            .patch(
                &ref_segments,
                &json!({ "sha": new_commit_sha }),
                "Failed to update reference",
            )
            .await?;

        Ok(PushResult {
            message: format!("Successfully pushed {} files", files.len()),
            commit: new_commit,
            branch: branch.to_string(),
        })
    }
}

fn attach_decoded_content(file: &mut Map<String, Value>) {
    if file.get("type").and_then(Value::as_str) != Some("file") {
        return;
    }
    let Some(encoded) = file.get("content").and_then(Value::as_str) else {
        return;
    };

    match decode_content(encoded) {
        Ok(decoded) => {
            file.insert("decoded_content".to_string(), Value::String(decoded));
        }
        Err(e) => debug!(error = %e, "Leaving file content undecoded"),
    }
}

/// Read a nested string field from a backend document.
pub(crate) fn string_field(value: &Value, path: &[&str], what: &str) -> GitHubResult<String> {
    path.iter()
        .try_fold(value, |v, key| v.get(*key))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| GitHubError::server(format!("GitHub response is missing the {}", what)))
}
