//! Main client for the hubgate SDK.

use crate::api::{EventsApi, ServerApi, ToolsApi};
use crate::config::{ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
use crate::error::{GatewayError, GatewayResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Main client for interacting with a gateway.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl GatewayClient {
    /// Create a new client builder.
    pub fn builder() -> GatewayClientBuilder {
        GatewayClientBuilder::new()
    }

    fn from_config(config: ClientConfig) -> GatewayResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Get the server API.
    pub fn server(&self) -> ServerApi<'_> {
        ServerApi::new(self)
    }

    /// Get the tools API.
    pub fn tools(&self) -> ToolsApi<'_> {
        ToolsApi::new(self)
    }

    /// Get the events API.
    pub fn events(&self) -> EventsApi<'_> {
        EventsApi::new(self)
    }
}

/// Builder for creating a GatewayClient.
pub struct GatewayClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    connect_timeout: Duration,
}

impl GatewayClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Set the base URL of the gateway.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> GatewayResult<GatewayClient> {
        let base_url_str = self
            .base_url
            .ok_or_else(|| GatewayError::Config("base_url is required".to_string()))?;

        let base_url = Url::parse(&base_url_str)?;

        GatewayClient::from_config(ClientConfig {
            base_url,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
        })
    }
}

impl Default for GatewayClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
