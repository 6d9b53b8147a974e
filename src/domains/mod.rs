//! Domains module containing business logic organized by bounded contexts.
//!
//! - `tools`: the MCP-facing tool layer (registry, dispatch, responses)
//! - `travel`: the travel collaborators and the data handed to them

pub mod tools;
pub mod travel;
