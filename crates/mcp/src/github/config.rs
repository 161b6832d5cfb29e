//! Connection settings for the GitHub REST API.

use std::time::Duration;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = concat!("hubgate/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration injected into a [`GitHubClient`](super::GitHubClient).
#[derive(Clone)]
pub struct GitHubConfig {
    /// Base URL of the REST API.
    pub api_url: Url,
    /// Personal access token used for every request.
    pub token: String,
    /// User agent sent with every request (required by GitHub).
    pub user_agent: String,
    /// Request timeout enforced by the transport.
    pub timeout: Duration,
}

impl GitHubConfig {
    /// Configuration for the API at `api_url` with the given token.
    pub fn new(api_url: Url, token: impl Into<String>) -> Self {
        Self {
            api_url,
            token: token.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("api_url", &self.api_url.as_str())
            .field("token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn public_api() -> Url {
        Url::parse(DEFAULT_API_URL).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = GitHubConfig::new(public_api(), "ghp_test");

        assert_eq!(config.api_url.as_str(), "https://api.github.com/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("hubgate/"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = GitHubConfig::new(public_api(), "ghp_secret_value");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("ghp_secret_value"));
        assert!(debug.contains("<redacted>"));
    }
}
