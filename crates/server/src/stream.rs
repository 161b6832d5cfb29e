//! Server-Sent Event streams.
//!
//! Each connection gets its own [`StreamSession`] driven by an
//! `async_stream` generator. The generator only lives as long as the
//! response body, so a client disconnect drops it and ends the session.

use async_trait::async_trait;
use axum::http::{header, HeaderName, HeaderValue};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::{Stream, StreamExt};
use hubgate_core::{GitHubResult, RepoScope, RepoSnapshot, StreamFrame, StreamSession};
use hubgate_mcp::protocol::PROTOCOL_VERSION;
use hubgate_mcp::GitHubClient;
use serde_json::Value;
use std::convert::Infallible;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Repository reads polled by scoped streams.
#[async_trait]
pub trait RepositorySource: Send + Sync {
    async fn repository(&self, owner: &str, repo: &str) -> GitHubResult<Value>;
}

#[async_trait]
impl RepositorySource for GitHubClient {
    async fn repository(&self, owner: &str, repo: &str) -> GitHubResult<Value> {
        self.repositories().get(owner, repo).await
    }
}

/// Logs the session lifecycle and marks it closed when the stream is dropped.
struct LiveSession(StreamSession);

impl LiveSession {
    fn open(scope: Option<RepoScope>) -> Self {
        let session = StreamSession::new(scope);
        match session.scope() {
            Some(scope) => info!(session = %session.id(), repository = %scope, "Stream opened"),
            None => info!(session = %session.id(), "Stream opened"),
        }
        Self(session)
    }
}

impl Deref for LiveSession {
    type Target = StreamSession;

    fn deref(&self) -> &StreamSession {
        &self.0
    }
}

impl DerefMut for LiveSession {
    fn deref_mut(&mut self) -> &mut StreamSession {
        &mut self.0
    }
}

impl Drop for LiveSession {
    fn drop(&mut self) {
        self.0.close();
        let open_for = chrono::Utc::now() - self.0.created_at();
        info!(
            session = %self.0.id(),
            seconds = open_for.num_seconds(),
            "Stream closed"
        );
    }
}

/// A late tick pushes the schedule back instead of firing a catch-up burst.
fn pacing(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Handshake followed by a `ping` frame every `interval`.
pub fn heartbeat_frames(interval: Duration) -> impl Stream<Item = StreamFrame> + Send + 'static {
    async_stream::stream! {
        let mut session = LiveSession::open(None);
        for frame in session.handshake() {
            yield frame;
        }

        let mut interval = pacing(interval);
        loop {
            interval.tick().await;
            yield session.ping();
        }
    }
}

/// Handshake followed by a repository poll every `interval`.
///
/// A failed poll yields an `error` frame and polling continues.
pub fn repository_frames(
    source: Arc<dyn RepositorySource>,
    scope: RepoScope,
    interval: Duration,
) -> impl Stream<Item = StreamFrame> + Send + 'static {
    async_stream::stream! {
        let mut session = LiveSession::open(Some(scope.clone()));
        for frame in session.handshake() {
            yield frame;
        }

        let mut interval = pacing(interval);
        loop {
            interval.tick().await;

            let frame = match source.repository(&scope.owner, &scope.repo).await {
                Ok(repository) => match RepoSnapshot::from_repository(&repository) {
                    Some(snapshot) => session.repo_update(&snapshot),
                    None => session.error("Repository response has no name"),
                },
                Err(e) => {
                    debug!(repository = %scope, error = %e, "Repository poll failed");
                    session.error(&e.to_string())
                }
            };
            yield frame;
        }
    }
}

/// Wrap a frame stream in an SSE response with the gateway's stream headers.
pub fn sse_response<S>(frames: S) -> Response
where
    S: Stream<Item = StreamFrame> + Send + 'static,
{
    let events = frames.filter_map(|frame| async move {
        match frame.data() {
            Ok(data) => Some(Ok::<_, Infallible>(
                Event::default().event(frame.event.as_str()).data(data),
            )),
            Err(e) => {
                warn!(id = %frame.id(), error = %e, "Dropping unserializable frame");
                None
            }
        }
    });

    (
        [
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (
                HeaderName::from_static("x-accel-buffering"),
                HeaderValue::from_static("no"),
            ),
            (
                HeaderName::from_static("x-mcp-protocol-version"),
                HeaderValue::from_static(PROTOCOL_VERSION),
            ),
        ],
        Sse::new(events).keep_alive(KeepAlive::default()),
    )
        .into_response()
}
