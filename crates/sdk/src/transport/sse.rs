//! Server-Sent Event decoding.
//!
//! [`SseDecoder`] turns raw body chunks into [`SseEvent`]s. Chunk
//! boundaries may fall anywhere, including inside a line.
//! [`frame_stream`] layers that over a response body and parses each
//! event's data as a gateway [`StreamFrame`].

use crate::error::{GatewayError, GatewayResult};
use bytes::Bytes;
use futures_util::stream::{self, BoxStream};
use futures_util::StreamExt;
use hubgate_core::session::FramePayload;
use hubgate_core::StreamFrame;
use reqwest::Response;
use std::collections::VecDeque;
use tracing::trace;

/// Event name used when the server sends data without an `event:` line.
const DEFAULT_EVENT: &str = "message";

/// One dispatched Server-Sent Event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: String,
    pub data: String,
    pub id: Option<String>,
}

/// Incremental `text/event-stream` decoder.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
    id: Option<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every event it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(end) = self.buffer.iter().position(|b| *b == b'\n') {
            let mut line: Vec<u8> = self.buffer.drain(..=end).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }

            if let Some(event) = self.process_line(&String::from_utf8_lossy(&line)) {
                events.push(event);
            }
        }
        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        // Comment, used for keep-alives.
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            "id" => self.id = Some(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        let id = self.id.take();
        if self.data.is_empty() {
            return None;
        }

        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent {
            event: event.unwrap_or_else(|| DEFAULT_EVENT.to_string()),
            data,
            id,
        })
    }
}

/// Stream of frames read from an open event-stream response.
pub type FrameStream = BoxStream<'static, GatewayResult<StreamFrame>>;

struct FrameReader {
    body: BoxStream<'static, reqwest::Result<Bytes>>,
    decoder: SseDecoder,
    pending: VecDeque<SseEvent>,
    done: bool,
}

fn parse_frame(event: SseEvent) -> GatewayResult<StreamFrame> {
    let payload: FramePayload = serde_json::from_str(&event.data)?;
    Ok(StreamFrame {
        event: event.event,
        payload,
    })
}

/// Decode a response body into gateway frames. The stream ends when the
/// server closes the connection or after the first transport error.
pub fn frame_stream(response: Response) -> FrameStream {
    let reader = FrameReader {
        body: response.bytes_stream().boxed(),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        done: false,
    };

    stream::unfold(reader, |mut reader| async move {
        loop {
            if let Some(event) = reader.pending.pop_front() {
                trace!(event = %event.event, "Received stream event");
                return Some((parse_frame(event), reader));
            }
            if reader.done {
                return None;
            }

            match reader.body.next().await {
                Some(Ok(chunk)) => {
                    let events = reader.decoder.feed(&chunk);
                    reader.pending.extend(events);
                }
                Some(Err(e)) => {
                    reader.done = true;
                    return Some((Err(GatewayError::Http(e)), reader));
                }
                None => reader.done = true,
            }
        }
    })
    .boxed()
}
