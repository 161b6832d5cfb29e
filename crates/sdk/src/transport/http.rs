//! HTTP transport layer for the hubgate SDK.

use crate::config::ClientConfig;
use crate::error::{GatewayError, GatewayResult};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::debug;

/// HTTP transport for making gateway requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    /// No overall timeout, for long-lived event streams.
    stream_client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let mut stream_headers = header::HeaderMap::new();
        stream_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("text/event-stream"),
        );
        let stream_client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .default_headers(stream_headers)
            .build()?;

        Ok(Self {
            client,
            stream_client,
            config,
        })
    }

    /// Build a URL for the given path.
    pub(crate) fn build_url(&self, path: &str) -> GatewayResult<url::Url> {
        self.config.base_url.join(path).map_err(GatewayError::InvalidUrl)
    }

    /// Build a URL from raw path segments, percent-encoding each one.
    pub(crate) fn segments_url(&self, segments: &[&str]) -> GatewayResult<url::Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::Config("base_url cannot be used as a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and turn non-success statuses into errors.
    async fn execute(&self, request: RequestBuilder) -> GatewayResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "Gateway returned an error");
        Err(GatewayError::from_response(status.as_u16(), &body))
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request");

        let response = self.execute(self.client.get(url)).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Execute a POST request with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> GatewayResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "POST request");

        let response = self.execute(self.client.post(url).json(body)).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Execute a POST request without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> GatewayResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "POST request");

        let response = self.execute(self.client.post(url)).await?;
        let body = response.json().await?;
        Ok(body)
    }

    /// Open a long-lived GET whose body is consumed as a stream.
    pub async fn open_stream(&self, path: &str) -> GatewayResult<Response> {
        self.open_stream_url(self.build_url(path)?).await
    }

    pub(crate) async fn open_stream_url(&self, url: url::Url) -> GatewayResult<Response> {
        debug!(url = %url, "Opening event stream");

        self.execute(self.stream_client.get(url)).await
    }
}
