//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients to perform
//! specific actions or computations.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `registry.rs` - Central tool registry, built once at startup
//! - `dispatcher.rs` - Validation and routing of tool calls
//! - `bridge.rs` - Offloading of blocking collaborator calls
//! - `schema.rs` - Input schema declaration and validation
//! - `response.rs` - Text + JSON blob response assembly
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Implement `ToolHandler` for it
//! 3. Export in `definitions/mod.rs`
//! 4. Register it in `ToolRegistry::travel()`
//!
//! **No need to modify `server.rs` or the transports!**

pub mod bridge;
pub mod definitions;
mod dispatcher;
mod error;
mod handlers;
mod registry;
pub mod response;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_support;

pub use bridge::{BlockingBridge, BlockingStrategy};
pub use dispatcher::Dispatcher;
pub use error::ToolError;
pub use handlers::*;
pub use registry::ToolRegistry;
pub use response::{ContentPart, ToolResponse};
pub use schema::{SchemaNode, SchemaType};
