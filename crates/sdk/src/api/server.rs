//! Server metadata and session endpoints.

use crate::client::GatewayClient;
use crate::error::GatewayResult;
use hubgate_mcp::protocol::{InitializeResult, ServerInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server API for identity, status and session setup.
pub struct ServerApi<'a> {
    client: &'a GatewayClient,
}

impl<'a> ServerApi<'a> {
    pub(crate) fn new(client: &'a GatewayClient) -> Self {
        Self { client }
    }

    /// Server name, version and capabilities.
    pub async fn info(&self) -> GatewayResult<ServerInfo> {
        self.client.http.get("/api/info").await
    }

    /// Liveness and credential status.
    pub async fn status(&self) -> GatewayResult<ServerStatus> {
        self.client.http.get("/api/status").await
    }

    /// Start a streaming session. The result names the stream endpoint.
    pub async fn initialize(&self) -> GatewayResult<InitializeResult> {
        self.client.http.post_empty("/initialize").await
    }

    /// Send a client message. The gateway acknowledges without processing it.
    pub async fn send(&self, message: &Value) -> GatewayResult<MessageAck> {
        self.client.http.post("/send", message).await
    }
}

/// Response of `/api/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerStatus {
    pub status: String,
    pub version: String,
    pub github_token: String,
}

/// Acknowledgement of a sent message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageAck {
    pub id: Value,
    pub status: String,
    /// Receipt time in epoch milliseconds.
    pub time: i64,
}
