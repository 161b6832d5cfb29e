//! Tool catalog, argument decoding and dispatch.

pub mod args;
mod dispatcher;
mod registry;

pub use args::{ArgsError, Forwarded, ToolArgs};
pub use dispatcher::{ToolDispatcher, ToolError};
pub use registry::{
    json_schema_array, json_schema_boolean, json_schema_number, json_schema_object,
    json_schema_string, ToolName, ToolRegistry,
};
