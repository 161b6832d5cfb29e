use crate::config::AppState;
use anyhow::Result;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use hubgate_core::{ErrorEnvelope, GitHubError};
use hubgate_mcp::ToolError;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

mod handlers;

/// Start the API server
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/api/status", get(handlers::status))
        // Tool routes
        .route("/api/info", get(handlers::server_info))
        .route("/api/tools", get(handlers::list_tools))
        .route("/api/call", post(handlers::call_tool))
        // Session routes
        .route("/initialize", post(handlers::initialize))
        .route("/send", post(handlers::send_message))
        .route("/message/stream", get(handlers::message_stream))
        .route("/messages", get(handlers::message_stream))
        .route("/sse", get(handlers::message_stream))
        .route("/events", get(handlers::message_stream))
        .route("/api/events", get(handlers::message_stream))
        .route(
            "/api/repos/{owner}/{repo}/events",
            get(handlers::repository_events),
        )
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().include_headers(true))
                        .on_response(DefaultOnResponse::new().include_headers(true)),
                )
                .layer(CorsLayer::permissive()),
        )
        .with_state(Arc::new(state))
}

/// Error type for API handlers. Every variant renders as an
/// [`ErrorEnvelope`].
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request body.
    BadRequest(String),
    Tool(ToolError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = match &self {
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                GitHubError::validation(message.clone()).envelope(),
            ),
            ApiError::Tool(err) if err.is_request_error() => {
                (StatusCode::BAD_REQUEST, err.envelope())
            }
            ApiError::Tool(err) => {
                tracing::error!(kind = %err.kind(), error = %err, "Tool call failed");
                (StatusCode::INTERNAL_SERVER_ERROR, err.envelope())
            }
        };

        (status, Json::<ErrorEnvelope>(envelope)).into_response()
    }
}

impl From<ToolError> for ApiError {
    fn from(err: ToolError) -> Self {
        Self::Tool(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{any, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_app(api_url: &str) -> Router {
        let mut config = ServerConfig::default();
        config.github.api_url = api_url.to_string();
        create_router(AppState::new(&config, "ghp_test").unwrap())
    }

    async fn body_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 256)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_info_and_status() {
        let app = make_app("http://127.0.0.1:1");

        let info = app.clone().oneshot(get("/api/info")).await.unwrap();
        assert_eq!(info.status(), StatusCode::OK);
        let info = body_json(info).await;
        assert_eq!(info["name"], "github-mcp-server");
        assert_eq!(info["capabilities"], json!({ "tools": {} }));

        let status = body_json(app.clone().oneshot(get("/api/status")).await.unwrap()).await;
        assert_eq!(status["status"], "UP");
        assert_eq!(status["github_token"], "configured");

        let home = body_json(app.oneshot(get("/")).await.unwrap()).await;
        assert_eq!(home["status"], "running");
    }

    #[tokio::test]
    async fn test_list_tools() {
        let app = make_app("http://127.0.0.1:1");

        let tools = body_json(app.oneshot(get("/api/tools")).await.unwrap()).await;
        let tools = tools["tools"].as_array().unwrap();

        assert_eq!(tools.len(), 35);
        assert!(tools.iter().all(|t| t.get("inputSchema").is_some()));
    }

    #[tokio::test]
    async fn test_call_unknown_tool_is_bad_request() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let app = make_app(&server.uri());
        let response = app
            .oneshot(post_json("/api/call", json!({ "name": "nope", "arguments": {} })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "ValidationError");
        assert_eq!(body["message"], "Unknown tool: nope");
    }

    #[tokio::test]
    async fn test_call_without_body_is_bad_request() {
        let app = make_app("http://127.0.0.1:1");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/call")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(post_json("/api/call", json!({ "arguments": {} })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Tool name is required");
    }

    #[tokio::test]
    async fn test_call_get_repository() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/a/b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "b" })))
            .mount(&server)
            .await;

        let app = make_app(&server.uri());
        let response = app
            .oneshot(post_json(
                "/api/call",
                json!({ "name": "get_repository", "arguments": { "owner": "a", "repo": "b" } }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["content"][0]["type"], "text");
        let text: Value = serde_json::from_str(body["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(text, json!({ "name": "b" }));
    }

    #[tokio::test]
    async fn test_call_backend_failure_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/a/b"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({ "message": "API rate limit exceeded" }))
                    .insert_header("X-RateLimit-Reset", "1700000000"),
            )
            .mount(&server)
            .await;

        let app = make_app(&server.uri());
        let response = app
            .oneshot(post_json(
                "/api/call",
                json!({ "name": "get_repository", "arguments": { "owner": "a", "repo": "b" } }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "RateLimitError");
        assert_eq!(body["message"], "API rate limit exceeded");
        assert_eq!(body["details"], json!({ "message": "API rate limit exceeded" }));
        assert_eq!(body["reset_at"], "2023-11-14T22:13:20Z");
    }

    #[tokio::test]
    async fn test_initialize_and_send() {
        let app = make_app("http://127.0.0.1:1");

        let init = body_json(
            app.clone()
                .oneshot(Request::builder().method("POST").uri("/initialize").body(Body::empty()).unwrap())
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(init["messageEndpoint"], "/message/stream");
        assert_eq!(init["status"], "ready");
        assert_eq!(init["protocolVersion"], "1.0");
        assert!(uuid::Uuid::parse_str(init["id"].as_str().unwrap()).is_ok());

        let ack = body_json(
            app.oneshot(post_json("/send", json!({ "id": "m-1", "method": "x" })))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(ack["id"], "m-1");
        assert_eq!(ack["status"], "received");
        assert!(ack["time"].is_i64());
    }

    #[tokio::test]
    async fn test_event_routes_are_streams() {
        let app = make_app("http://127.0.0.1:1");

        for uri in ["/message/stream", "/sse", "/api/events", "/api/repos/a/b/events"] {
            let response = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
            assert_eq!(
                response.headers()[header::CONTENT_TYPE],
                "text/event-stream",
                "{}",
                uri
            );
            assert_eq!(response.headers()["x-mcp-protocol-version"], "1.0");
        }
    }
}
