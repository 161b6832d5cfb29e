// Gateway protocol types for the tool catalog and tool calls

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Protocol version advertised to clients.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Server name reported by `/api/info`.
pub const SERVER_NAME: &str = "github-mcp-server";

/// Tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// List tools response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<ToolSchema>,
}

/// Call tool request. Both fields are optional on the wire so a missing
/// name is reported as a validation error rather than a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallToolParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl CallToolParams {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: Some(name.into()),
            arguments: Some(arguments),
        }
    }
}

/// Call tool response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallToolResult {
    pub content: Vec<ToolContent>,
}

impl CallToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// `/api/info` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub capabilities: ServerCapabilities,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerCapabilities {
    #[serde(default)]
    pub tools: Map<String, Value>,
}

/// `/initialize` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResult {
    pub id: String,
    #[serde(rename = "messageEndpoint")]
    pub message_endpoint: String,
    pub status: String,
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
}
