//! Configuration types for the hubgate SDK.

use std::time::Duration;
use url::Url;

/// Default timeout for request/response calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the gateway client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the gateway.
    pub base_url: Url,
    /// Timeout for request/response calls. Event streams are not bound by it.
    pub timeout: Duration,
    /// Timeout for establishing a connection, streams included.
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}
