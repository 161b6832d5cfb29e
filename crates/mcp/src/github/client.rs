//! HTTP client for the GitHub REST API.

use super::config::GitHubConfig;
use crate::operations::{
    BranchesApi, CommitsApi, FilesApi, IssuesApi, PullsApi, RepositoryApi, SearchApi,
};
use hubgate_core::pagination::parse_link_header;
use hubgate_core::{classify, GitHubError, GitHubResult, RateLimitHeaders};
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

const ACCEPT_GITHUB_V3: &str = "application/vnd.github.v3+json";

/// A successful backend response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body; `Null` when the backend sent no body.
    pub body: Value,
    /// Raw `Link` header, if any.
    pub link: Option<String>,
}

impl ApiResponse {
    /// Continuation links from the `Link` header.
    pub fn links(&self) -> BTreeMap<String, String> {
        parse_link_header(self.link.as_deref())
    }
}

/// Authenticated GitHub client shared by all adapters.
///
/// Cloning is cheap; clones share the connection pool and configuration.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    config: Arc<GitHubConfig>,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> GitHubResult<Self> {
        let mut headers = header::HeaderMap::new();

        let auth = header::HeaderValue::from_str(&format!("token {}", config.token))
            .map_err(|_| GitHubError::server("Invalid GitHub token format"))?;
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static(ACCEPT_GITHUB_V3),
        );

        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| GitHubError::server(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    pub fn repositories(&self) -> RepositoryApi<'_> {
        RepositoryApi::new(self)
    }

    pub fn files(&self) -> FilesApi<'_> {
        FilesApi::new(self)
    }

    pub fn branches(&self) -> BranchesApi<'_> {
        BranchesApi::new(self)
    }

    pub fn commits(&self) -> CommitsApi<'_> {
        CommitsApi::new(self)
    }

    pub fn issues(&self) -> IssuesApi<'_> {
        IssuesApi::new(self)
    }

    pub fn pulls(&self) -> PullsApi<'_> {
        PullsApi::new(self)
    }

    pub fn search(&self) -> SearchApi<'_> {
        SearchApi::new(self)
    }

    /// Build an endpoint URL from path segments. Each segment is
    /// percent-encoded on its own.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> GitHubResult<Url> {
        let mut url = self.config.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| GitHubError::server("GitHub API URL cannot be used as a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET with query parameters.
    pub async fn get(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        error_message: &str,
    ) -> GitHubResult<ApiResponse> {
        let url = self.endpoint(segments)?;
        debug!(url = %url, "GET request");

        self.execute(self.http.get(url).query(query), error_message)
            .await
    }

    /// Request with a JSON body.
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
        error_message: &str,
    ) -> GitHubResult<ApiResponse> {
        let url = self.endpoint(segments)?;
        debug!(url = %url, method = %method, "JSON request");

        self.execute(self.http.request(method, url).json(body), error_message)
            .await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
        error_message: &str,
    ) -> GitHubResult<ApiResponse> {
        self.send_json(Method::POST, segments, body, error_message)
            .await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
        error_message: &str,
    ) -> GitHubResult<ApiResponse> {
        self.send_json(Method::PUT, segments, body, error_message)
            .await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
        error_message: &str,
    ) -> GitHubResult<ApiResponse> {
        self.send_json(Method::PATCH, segments, body, error_message)
            .await
    }

    /// Send once and classify the outcome. No retries.
    async fn execute(
        &self,
        request: RequestBuilder,
        error_message: &str,
    ) -> GitHubResult<ApiResponse> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "GitHub request failed");
            GitHubError::server(format!("{}: {}", error_message, e))
        })?;

        let status = response.status().as_u16();
        let link = header_value(&response, header::LINK.as_str());

        if !response.status().is_success() {
            let rate_limit = RateLimitHeaders::from_header_values(
                header_value(&response, "x-ratelimit-remaining").as_deref(),
                header_value(&response, "x-ratelimit-reset").as_deref(),
            );
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<Value>(&text).ok();
            let err = classify(status, body, rate_limit, error_message);

            debug!(status = status, kind = %err.kind(), "GitHub returned an error");
            return Err(err);
        }

        let text = response.text().await.map_err(|e| {
            GitHubError::server(format!("Failed to read GitHub response: {}", e))
        })?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                GitHubError::server(format!("Failed to parse GitHub response: {}", e))
            })?
        };

        Ok(ApiResponse { status, body, link })
    }
}

fn header_value(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hubgate_core::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_client(base_url: &str) -> GitHubClient {
        let config = GitHubConfig::new(Url::parse(base_url).unwrap(), "ghp_test");
        GitHubClient::new(config).unwrap()
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = create_client("https://ghe.example.com/api/v3/");
        let url = client.endpoint(&["repos", "octo", "hello world"]).unwrap();

        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/octo/hello%20world"
        );
    }

    #[tokio::test]
    async fn test_get_sends_auth_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/a/b"))
            .and(header("Authorization", "token ghp_test"))
            .and(header("Accept", ACCEPT_GITHUB_V3))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "b" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = create_client(&server.uri());
        let response = client.get(&["repos", "a", "b"], &[], "failed").await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({ "name": "b" }));
        assert!(response.link.is_none());
    }

    #[tokio::test]
    async fn test_query_and_link_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/a/b/issues"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .insert_header("Link", r#"<u3>; rel="next""#),
            )
            .mount(&server)
            .await;

        let client = create_client(&server.uri());
        let response = client
            .get(&["repos", "a", "b", "issues"], &[("page", "2".to_string())], "failed")
            .await
            .unwrap();

        assert_eq!(response.links()["next"], "u3");
    }

    #[tokio::test]
    async fn test_post_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/a/b/issues"))
            .and(body_json(json!({ "title": "bug" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "number": 1 })))
            .mount(&server)
            .await;

        let client = create_client(&server.uri());
        let response = client
            .post(&["repos", "a", "b", "issues"], &json!({ "title": "bug" }), "failed")
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.body["number"], 1);
    }

    #[tokio::test]
    async fn test_error_is_classified() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/a/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
            .mount(&server)
            .await;

        let client = create_client(&server.uri());
        let err = client
            .get(&["repos", "a", "missing"], &[], "Failed to get repository a/missing")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ResourceNotFoundError);
        assert_eq!(err.to_string(), "Not Found");
    }

    #[tokio::test]
    async fn test_rate_limit_headers_are_read() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rate"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({ "message": "API rate limit exceeded" }))
                    .insert_header("X-RateLimit-Remaining", "0")
                    .insert_header("X-RateLimit-Reset", "1700000000"),
            )
            .mount(&server)
            .await;

        let client = create_client(&server.uri());
        let err = client.get(&["rate"], &[], "failed").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RateLimitError);
        assert_eq!(err.reset_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn test_non_json_error_body_uses_default_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = create_client(&server.uri());
        let err = client.get(&["broken"], &[], "Request failed").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::GitHubError);
        assert_eq!(err.to_string(), "Request failed (Status code: 500)");
    }

    #[tokio::test]
    async fn test_empty_success_body_is_null() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/empty"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = create_client(&server.uri());
        let response = client.put(&["empty"], &json!({}), "failed").await.unwrap();

        assert_eq!(response.body, Value::Null);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_server_error() {
        let client = create_client("http://127.0.0.1:1");
        let err = client.get(&["repos"], &[], "Request failed").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ServerError);
    }
}
