use crate::stream::RepositorySource;
use anyhow::{Context, Result};
use hubgate_mcp::github::{DEFAULT_API_URL, DEFAULT_USER_AGENT};
use hubgate_mcp::{GitHubClient, GitHubConfig, ToolDispatcher};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub github: GitHubSettings,

    #[serde(default)]
    pub stream: StreamSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for GitHubSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Periodic frame intervals for event streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSettings {
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,

    #[serde(default = "default_repo_poll_interval_secs")]
    pub repo_poll_interval_secs: u64,
}

fn default_heartbeat_interval_secs() -> u64 {
    10
}

fn default_repo_poll_interval_secs() -> u64 {
    60
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            repo_poll_interval_secs: default_repo_poll_interval_secs(),
        }
    }
}

impl StreamSettings {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs.max(1))
    }

    pub fn repo_poll_interval(&self) -> Duration {
        Duration::from_secs(self.repo_poll_interval_secs.max(1))
    }
}

impl ServerConfig {
    pub fn load(config_path: &Path) -> Result<Self> {
        // Load config file if it exists, otherwise use defaults
        if !config_path.exists() {
            tracing::info!("Configuration file not found, using defaults");
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(config_path).context("Failed to read configuration file")?;
        toml::from_str(&content).context("Failed to parse configuration file")
    }

    /// Backend client configuration with the given credentials.
    pub fn github_config(&self, token: impl Into<String>) -> Result<GitHubConfig> {
        let api_url = Url::parse(&self.github.api_url)
            .with_context(|| format!("Invalid GitHub API URL: {}", self.github.api_url))?;

        Ok(GitHubConfig::new(api_url, token)
            .with_user_agent(self.github.user_agent.clone())
            .with_timeout(Duration::from_secs(self.github.timeout_secs)))
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: ToolDispatcher,
    pub repositories: Arc<dyn RepositorySource>,
    pub stream: StreamSettings,
}

impl AppState {
    pub fn new(config: &ServerConfig, token: impl Into<String>) -> Result<Self> {
        let client = GitHubClient::new(config.github_config(token)?)
            .context("Failed to create GitHub client")?;

        Ok(Self {
            dispatcher: ToolDispatcher::new(client.clone()),
            repositories: Arc::new(client),
            stream: config.stream,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::load(&dir.path().join("hubgate.toml")).unwrap();

        assert_eq!(config.github.api_url, DEFAULT_API_URL);
        assert_eq!(config.github.timeout_secs, 30);
        assert_eq!(config.stream, StreamSettings::default());
        assert_eq!(config.stream.heartbeat_interval(), Duration::from_secs(10));
        assert_eq!(config.stream.repo_poll_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[github]\napi_url = \"https://ghe.example.com/api/v3\"\n\n[stream]\nheartbeat_interval_secs = 2"
        )
        .unwrap();

        let config = ServerConfig::load(file.path()).unwrap();

        assert_eq!(config.github.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.github.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.stream.heartbeat_interval_secs, 2);
        assert_eq!(config.stream.repo_poll_interval_secs, 60);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[stream]\nheartbeat_interval_secs = \"soon\"").unwrap();

        assert!(ServerConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_github_config_rejects_bad_url() {
        let mut config = ServerConfig::default();
        config.github.api_url = "not a url".to_string();

        assert!(config.github_config("ghp_test").is_err());
    }

    #[test]
    fn test_github_config_applies_settings() {
        let mut config = ServerConfig::default();
        config.github.timeout_secs = 5;

        let github = config.github_config("ghp_test").unwrap();
        assert_eq!(github.timeout, Duration::from_secs(5));
        assert_eq!(github.api_url.as_str(), "https://api.github.com/");
    }
}
