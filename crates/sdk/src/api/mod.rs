//! API endpoint groups.

mod events;
mod server;
mod tools;

pub use events::EventsApi;
pub use server::{MessageAck, ServerApi, ServerStatus};
pub use tools::ToolsApi;
