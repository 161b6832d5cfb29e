//! Transport layer for the hubgate SDK.

pub mod http;
pub mod sse;

pub use http::HttpTransport;
pub use sse::{frame_stream, FrameStream, SseDecoder, SseEvent};
