//! GitHub REST API access.

mod client;
mod config;

pub use client::{ApiResponse, GitHubClient};
pub use config::{GitHubConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
