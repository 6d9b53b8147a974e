//! Travel MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing two travel tools:
//! `travel.plan_trip`, which hands a free-form question to a multi-step
//! travel pipeline, and `travel.search_flights`, which runs a flight search
//! through a SERP provider.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the MCP server and its transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: registry, dispatcher, blocking bridge and response assembly
//!   - **travel**: pipeline state, query formatting and the collaborator clients
//!
//! # Example
//!
//! ```rust,no_run
//! use travel_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
