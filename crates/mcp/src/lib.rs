// GitHub tool gateway: backend client, resource adapters and tool dispatch

pub mod github;
pub mod operations;
pub mod protocol;
pub mod tools;

pub use github::{GitHubClient, GitHubConfig};
pub use tools::{ToolDispatcher, ToolError, ToolName, ToolRegistry};
