use super::{ApiError, ApiResult};
use crate::config::AppState;
use crate::stream;
use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Response,
    Json,
};
use hubgate_core::RepoScope;
use hubgate_mcp::protocol::{
    CallToolParams, CallToolResult, InitializeResult, ListToolsResult, ServerCapabilities,
    ServerInfo, PROTOCOL_VERSION, SERVER_NAME,
};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn home() -> Json<Value> {
    Json(json!({
        "name": "MCP GitHub Server",
        "version": VERSION,
        "status": "running",
    }))
}

pub async fn status() -> Json<Value> {
    // The server refuses to start without a token.
    Json(json!({
        "status": "UP",
        "version": VERSION,
        "github_token": "configured",
    }))
}

pub async fn server_info() -> Json<ServerInfo> {
    Json(ServerInfo {
        name: SERVER_NAME.to_string(),
        version: VERSION.to_string(),
        capabilities: ServerCapabilities::default(),
    })
}

pub async fn list_tools(State(state): State<Arc<AppState>>) -> Json<ListToolsResult> {
    Json(ListToolsResult {
        tools: state.dispatcher.tools().to_vec(),
    })
}

pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<CallToolResult>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest("No request data provided".to_string()));
    }

    let params: CallToolParams = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {}", e)))?;

    let result = state.dispatcher.dispatch(params).await?;
    Ok(Json(result))
}

pub async fn initialize() -> Json<InitializeResult> {
    Json(InitializeResult {
        id: Uuid::new_v4().to_string(),
        message_endpoint: "/message/stream".to_string(),
        status: "ready".to_string(),
        protocol_version: PROTOCOL_VERSION.to_string(),
    })
}

/// Acknowledge a client message. The body is logged, not processed.
pub async fn send_message(body: Bytes) -> Json<Value> {
    let message: Option<Value> = serde_json::from_slice(&body).ok();
    let id = message
        .as_ref()
        .and_then(|m| m.get("id"))
        .filter(|id| !id.is_null())
        .cloned()
        .unwrap_or_else(|| Value::String(Uuid::new_v4().to_string()));

    tracing::info!(id = %id, message = ?message, "Received message");

    Json(json!({
        "id": id,
        "status": "received",
        "time": chrono::Utc::now().timestamp_millis(),
    }))
}

pub async fn message_stream(State(state): State<Arc<AppState>>) -> Response {
    stream::sse_response(stream::heartbeat_frames(state.stream.heartbeat_interval()))
}

pub async fn repository_events(
    State(state): State<Arc<AppState>>,
    Path((owner, repo)): Path<(String, String)>,
) -> Response {
    stream::sse_response(stream::repository_frames(
        state.repositories.clone(),
        RepoScope::new(owner, repo),
        state.stream.repo_poll_interval(),
    ))
}
