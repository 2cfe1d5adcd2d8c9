//! Content types for MCP tool responses.
//!
//! Every tool answers with exactly one text content item.

pub mod types;

pub use types::{ContentItem, ToolResult};
