//! Tool-specific error types.

use std::time::Duration;

use rmcp::ErrorData as McpError;
use serde_json::json;
use thiserror::Error;

use crate::domains::travel::CollaboratorError;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool is not registered.
    #[error("Unsupported tool: {0}")]
    UnknownTool(String),

    /// A field listed as required by the input schema is absent.
    #[error("Missing required argument: {field}")]
    MissingRequiredArgument { field: String },

    /// A field is present but does not have the declared type.
    #[error("Invalid argument '{field}': expected {expected}")]
    InvalidArgument {
        field: String,
        expected: &'static str,
    },

    /// The pipeline or search collaborator failed while running.
    #[error("{collaborator} failed: {source}")]
    CollaboratorFailure {
        collaborator: &'static str,
        #[source]
        source: CollaboratorError,
    },

    /// The collaborator did not finish within the configured timeout.
    #[error("{collaborator} timed out after {after:?}")]
    Timeout {
        collaborator: &'static str,
        after: Duration,
    },

    /// A tool result could not be serialized.
    #[error("Failed to serialize tool result: {0}")]
    Serialization(#[source] serde_json::Error),

    /// A tool with the same name is already registered.
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "missing required argument" error.
    pub fn missing_argument(field: impl Into<String>) -> Self {
        Self::MissingRequiredArgument {
            field: field.into(),
        }
    }

    /// Create a new "invalid argument" error.
    pub fn invalid_argument(field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            expected,
        }
    }

    /// Wrap a collaborator error.
    pub fn collaborator(collaborator: &'static str, source: CollaboratorError) -> Self {
        Self::CollaboratorFailure {
            collaborator,
            source,
        }
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error was caused by the caller's request rather than by
    /// the server or a collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownTool(_)
                | Self::MissingRequiredArgument { .. }
                | Self::InvalidArgument { .. }
        )
    }
}

impl From<ToolError> for McpError {
    fn from(err: ToolError) -> Self {
        let message = err.to_string();
        match &err {
            ToolError::UnknownTool(name) => {
                McpError::invalid_params(message, Some(json!({ "tool": name })))
            }
            ToolError::MissingRequiredArgument { field } => {
                McpError::invalid_params(message, Some(json!({ "field": field })))
            }
            ToolError::InvalidArgument { field, expected } => McpError::invalid_params(
                message,
                Some(json!({ "field": field, "expected": expected })),
            ),
            ToolError::CollaboratorFailure {
                collaborator,
                source,
            } => McpError::internal_error(
                message,
                Some(json!({
                    "collaborator": collaborator,
                    "detail": source.to_string(),
                })),
            ),
            ToolError::Timeout {
                collaborator,
                after,
            } => McpError::internal_error(
                message,
                Some(json!({
                    "collaborator": collaborator,
                    "timeout_secs": after.as_secs(),
                })),
            ),
            ToolError::Serialization(_) | ToolError::DuplicateTool(_) | ToolError::Internal(_) => {
                McpError::internal_error(message, None)
            }
        }
    }
}
