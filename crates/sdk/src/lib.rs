//! # hubgate SDK
//!
//! Rust client for the hubgate GitHub tool gateway.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hubgate_sdk::{GatewayClient, GatewayResult};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> GatewayResult<()> {
//!     let client = GatewayClient::builder()
//!         .base_url("http://localhost:8080")
//!         .build()?;
//!
//!     let info = client.server().info().await?;
//!     println!("Connected to {} {}", info.name, info.version);
//!
//!     let repo: serde_json::Value = client
//!         .tools()
//!         .call_json("get_repository", json!({ "owner": "rust-lang", "repo": "rust" }))
//!         .await?;
//!     println!("{}", repo["full_name"]);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Event Streams
//!
//! ```rust,no_run
//! use futures_util::StreamExt;
//! use hubgate_sdk::GatewayClient;
//!
//! # async fn example() -> hubgate_sdk::GatewayResult<()> {
//! let client = GatewayClient::builder()
//!     .base_url("http://localhost:8080")
//!     .build()?;
//!
//! let mut frames = client.events().connect_repository("rust-lang", "rust").await?;
//! while let Some(frame) = frames.next().await {
//!     let frame = frame?;
//!     if frame.method() == "repo_update" {
//!         println!("stars: {}", frame.payload.params["stars"]);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;

pub use client::{GatewayClient, GatewayClientBuilder};
pub use config::ClientConfig;
pub use error::{GatewayError, GatewayResult};
pub use transport::FrameStream;

// Re-export wire types for convenience
pub use hubgate_core::{ErrorEnvelope, ErrorKind, StreamFrame};
pub use hubgate_mcp::protocol::{
    CallToolResult, InitializeResult, ServerInfo, ToolContent, ToolSchema,
};
