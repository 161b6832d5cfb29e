// Search operations

use super::{search_envelope, Page};
use crate::github::GitHubClient;
use hubgate_core::{GitHubResult, ResultEnvelope};
use serde_json::Value;

/// Search families besides repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Code,
    Issues,
    Users,
}

impl SearchKind {
    fn endpoint(self) -> &'static str {
        match self {
            SearchKind::Code => "code",
            SearchKind::Issues => "issues",
            SearchKind::Users => "users",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            SearchKind::Code => "Code search failed",
            SearchKind::Issues => "Issues search failed",
            SearchKind::Users => "Users search failed",
        }
    }
}

pub struct SearchApi<'a> {
    client: &'a GitHubClient,
}

impl<'a> SearchApi<'a> {
    pub(crate) fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    pub async fn search(
        &self,
        kind: SearchKind,
        query: &str,
        page: Page,
    ) -> GitHubResult<ResultEnvelope<Value>> {
        let mut params = vec![("q", query.to_string())];
        params.extend(page.query());

        let response = self
            .client
            .get(&["search", kind.endpoint()], &params, kind.failure_message())
            .await?;
        search_envelope(response, page)
    }
}
