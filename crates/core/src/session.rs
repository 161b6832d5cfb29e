//! Stream session identity, lifecycle state and frame construction.
//!
//! A [`StreamSession`] is owned by the connection handler that created it.
//! It hands out frames in emission order and numbers periodic frames with a
//! session-local counter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Every frame is emitted under this SSE event name.
pub const FRAME_EVENT: &str = "message";

pub const JSONRPC_VERSION: &str = "2.0";

/// Repository a scoped stream is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoScope {
    pub owner: String,
    pub repo: String,
}

impl RepoScope {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl std::fmt::Display for RepoScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Opening,
    Ready,
    Streaming,
    Closed,
}

/// JSON-RPC shaped payload carried in a frame's `data` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramePayload {
    pub jsonrpc: String,
    pub method: String,
    pub id: String,
    pub params: Map<String, Value>,
}

/// One discrete message on a streaming connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamFrame {
    pub event: String,
    pub payload: FramePayload,
}

impl StreamFrame {
    fn new(method: &str, id: String, params: Map<String, Value>) -> Self {
        Self {
            event: FRAME_EVENT.to_string(),
            payload: FramePayload {
                jsonrpc: JSONRPC_VERSION.to_string(),
                method: method.to_string(),
                id,
                params,
            },
        }
    }

    pub fn method(&self) -> &str {
        &self.payload.method
    }

    pub fn id(&self) -> &str {
        &self.payload.id
    }

    /// Serialized payload, as written to the SSE `data` line.
    pub fn data(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.payload)
    }
}

/// Repository fields reported by `repo_update` frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSnapshot {
    pub name: String,
    pub stars: u64,
    pub forks: u64,
}

impl RepoSnapshot {
    /// Pull the reported fields out of a repository document. Missing
    /// counters read as zero.
    pub fn from_repository(repository: &Value) -> Option<Self> {
        Some(Self {
            name: repository.get("name")?.as_str()?.to_string(),
            stars: repository
                .get("stargazers_count")
                .and_then(Value::as_u64)
                .unwrap_or(0),
            forks: repository
                .get("forks_count")
                .and_then(Value::as_u64)
                .unwrap_or(0),
        })
    }
}

/// Identity and lifecycle of one streaming connection.
#[derive(Debug)]
pub struct StreamSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    scope: Option<RepoScope>,
    state: SessionState,
    message_id: u64,
}

impl StreamSession {
    pub fn new(scope: Option<RepoScope>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            scope,
            state: SessionState::Opening,
            message_id: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn scope(&self) -> Option<&RepoScope> {
        self.scope.as_ref()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Emit the `open` and `ready` frames and move to `Ready`.
    ///
    /// Only an `Opening` session produces a handshake; later calls return
    /// nothing.
    pub fn handshake(&mut self) -> Vec<StreamFrame> {
        if self.state != SessionState::Opening {
            return Vec::new();
        }

        let now = now_millis();
        let open = StreamFrame::new("open", self.id.to_string(), time_params(now));

        let mut ready_params = time_params(now);
        if let Some(scope) = &self.scope {
            ready_params.insert("repository".to_string(), Value::String(scope.to_string()));
        }
        let ready = StreamFrame::new("ready", format!("{}-ready", self.id), ready_params);

        self.state = SessionState::Ready;
        vec![open, ready]
    }

    /// Liveness frame for heartbeat streams.
    pub fn ping(&mut self) -> StreamFrame {
        let n = self.next_message_id();
        StreamFrame::new("ping", format!("ping-{}", n), time_params(now_millis()))
    }

    /// Repository state frame for scoped streams.
    pub fn repo_update(&mut self, snapshot: &RepoSnapshot) -> StreamFrame {
        let n = self.next_message_id();
        let mut params = time_params(now_millis());
        params.insert("repository".to_string(), Value::String(snapshot.name.clone()));
        params.insert("stars".to_string(), Value::from(snapshot.stars));
        params.insert("forks".to_string(), Value::from(snapshot.forks));
        StreamFrame::new("repo_update", format!("update-{}", n), params)
    }

    /// Failure frame for scoped streams. The session keeps streaming.
    pub fn error(&mut self, message: &str) -> StreamFrame {
        let n = self.next_message_id();
        let mut params = time_params(now_millis());
        params.insert("message".to_string(), Value::String(message.to_string()));
        StreamFrame::new("error", format!("error-{}", n), params)
    }

    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }

    fn next_message_id(&mut self) -> u64 {
        if self.state == SessionState::Ready {
            self.state = SessionState::Streaming;
        }
        self.message_id += 1;
        self.message_id
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn time_params(now: i64) -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("time".to_string(), Value::from(now));
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_handshake_frames() {
        let mut session = StreamSession::new(None);
        assert_eq!(session.state(), SessionState::Opening);

        let frames = session.handshake();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].method(), "open");
        assert_eq!(frames[0].id(), session.id().to_string());
        assert_eq!(frames[1].method(), "ready");
        assert_eq!(frames[1].id(), format!("{}-ready", session.id()));
        assert!(frames[1].payload.params.get("repository").is_none());
        assert_eq!(session.state(), SessionState::Ready);

        // Handshake happens once
        assert!(session.handshake().is_empty());
    }

    #[test]
    fn test_scoped_ready_names_repository() {
        let mut session = StreamSession::new(Some(RepoScope::new("octo", "hello")));
        let frames = session.handshake();

        assert_eq!(frames[1].payload.params["repository"], "octo/hello");
    }

    #[test]
    fn test_periodic_ids_increase() {
        let mut session = StreamSession::new(None);
        session.handshake();

        let ids: Vec<String> = (0..3).map(|_| session.ping().id().to_string()).collect();
        assert_eq!(ids, vec!["ping-1", "ping-2", "ping-3"]);
        assert_eq!(session.state(), SessionState::Streaming);
    }

    #[test]
    fn test_update_and_error_share_counter() {
        let mut session = StreamSession::new(Some(RepoScope::new("a", "b")));
        session.handshake();

        let snapshot = RepoSnapshot {
            name: "b".to_string(),
            stars: 5,
            forks: 2,
        };
        let update = session.repo_update(&snapshot);
        let error = session.error("Not Found");

        assert_eq!(update.id(), "update-1");
        assert_eq!(update.payload.params["stars"], 5);
        assert_eq!(update.payload.params["forks"], 2);
        assert_eq!(error.id(), "error-2");
        assert_eq!(error.payload.params["message"], "Not Found");
    }

    #[test]
    fn test_frame_data_is_jsonrpc() {
        let mut session = StreamSession::new(None);
        session.handshake();
        let data: Value = serde_json::from_str(&session.ping().data().unwrap()).unwrap();

        assert_eq!(data["jsonrpc"], "2.0");
        assert_eq!(data["method"], "ping");
        assert!(data["params"]["time"].is_i64());
    }

    #[test]
    fn test_snapshot_from_repository() {
        let snapshot = RepoSnapshot::from_repository(&json!({
            "name": "b",
            "stargazers_count": 5
        }))
        .unwrap();

        assert_eq!(snapshot.stars, 5);
        assert_eq!(snapshot.forks, 0);
        assert!(RepoSnapshot::from_repository(&json!({})).is_none());
    }

    #[test]
    fn test_close() {
        let mut session = StreamSession::new(None);
        session.handshake();
        session.close();
        assert_eq!(session.state(), SessionState::Closed);
    }
}
