//! Event stream endpoints.

use crate::client::GatewayClient;
use crate::error::GatewayResult;
use crate::transport::{frame_stream, FrameStream};

/// Events API for subscribing to gateway streams.
pub struct EventsApi<'a> {
    client: &'a GatewayClient,
}

impl<'a> EventsApi<'a> {
    pub(crate) fn new(client: &'a GatewayClient) -> Self {
        Self { client }
    }

    /// Open the heartbeat stream: a handshake, then periodic pings.
    pub async fn connect(&self) -> GatewayResult<FrameStream> {
        let response = self.client.http.open_stream("/message/stream").await?;
        Ok(frame_stream(response))
    }

    /// Open a stream of periodic updates for one repository.
    pub async fn connect_repository(&self, owner: &str, repo: &str) -> GatewayResult<FrameStream> {
        let http = &self.client.http;
        let url = http.segments_url(&["api", "repos", owner, repo, "events"])?;
        let response = http.open_stream_url(url).await?;
        Ok(frame_stream(response))
    }
}
