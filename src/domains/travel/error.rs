//! Collaborator error types.

use thiserror::Error;

/// Errors raised by the pipeline or search collaborators.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// The collaborator has no endpoint or credentials configured.
    #[error("{0} is not configured")]
    NotConfigured(String),

    /// The HTTP request to the collaborator failed.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The collaborator answered with something we cannot use.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    /// The requested search engine is not supported.
    #[error("unsupported search engine: {0}")]
    UnsupportedEngine(String),

    /// Any other failure reported by the collaborator.
    #[error("{0}")]
    Other(String),
}

impl CollaboratorError {
    /// Create a new "not configured" error.
    pub fn not_configured(what: impl Into<String>) -> Self {
        Self::NotConfigured(what.into())
    }

    /// Create a new "invalid response" error.
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create a new generic collaborator error.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
