//! Tool catalog and tool call endpoints.

use crate::client::GatewayClient;
use crate::error::{GatewayError, GatewayResult};
use hubgate_mcp::protocol::{CallToolParams, CallToolResult, ListToolsResult, ToolSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Tools API for listing and invoking gateway tools.
pub struct ToolsApi<'a> {
    client: &'a GatewayClient,
}

impl<'a> ToolsApi<'a> {
    pub(crate) fn new(client: &'a GatewayClient) -> Self {
        Self { client }
    }

    /// List the tool catalog.
    pub async fn list(&self) -> GatewayResult<Vec<ToolSchema>> {
        let response: ListToolsResult = self.client.http.get("/api/tools").await?;
        Ok(response.tools)
    }

    /// Invoke a tool by name.
    pub async fn call(&self, name: &str, arguments: Value) -> GatewayResult<CallToolResult> {
        self.client
            .http
            .post("/api/call", &CallToolParams::new(name, arguments))
            .await
    }

    /// Invoke a tool and decode the JSON carried in its text content.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        name: &str,
        arguments: Value,
    ) -> GatewayResult<T> {
        let result = self.call(name, arguments).await?;
        let content = result.content.first().ok_or_else(|| {
            GatewayError::UnexpectedResult(format!("{} returned no content", name))
        })?;

        Ok(serde_json::from_str(content.as_text())?)
    }
}
