//! Travel research pipeline collaborator.
//!
//! The pipeline is an opaque, synchronous and potentially very slow
//! component: it takes a [`PipelineState`] and returns the final state as a
//! JSON object. Calls must go through the blocking bridge.

use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info};

use super::error::CollaboratorError;
use super::state::PipelineState;

/// Contract of the travel research pipeline.
pub trait TravelPipeline: Send + Sync {
    /// Run the pipeline to completion. Blocks the calling thread.
    fn invoke(&self, state: PipelineState) -> Result<Map<String, Value>, CollaboratorError>;
}

/// Pipeline reached over HTTP.
///
/// The state is POSTed as a JSON body and the endpoint must answer with the
/// resulting state as a JSON object.
#[derive(Clone)]
pub struct HttpPipeline {
    url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpPipeline {
    pub fn new(url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            api_key,
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl std::fmt::Debug for HttpPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPipeline")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TravelPipeline for HttpPipeline {
    fn invoke(&self, state: PipelineState) -> Result<Map<String, Value>, CollaboratorError> {
        info!("Invoking travel pipeline at {}", self.url);

        // The blocking client owns a runtime of its own, so it is built on the
        // worker thread rather than at startup.
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;

        let mut request = client.post(&self.url).json(&state);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send()?.error_for_status()?;
        let body: Value = response.json()?;
        debug!("Pipeline responded");

        match body {
            Value::Object(result) => Ok(result),
            other => Err(CollaboratorError::invalid_response(format!(
                "pipeline must return a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Stand-in used when no pipeline endpoint is configured.
#[derive(Debug, Clone, Default)]
pub struct UnconfiguredPipeline;

impl TravelPipeline for UnconfiguredPipeline {
    fn invoke(&self, _state: PipelineState) -> Result<Map<String, Value>, CollaboratorError> {
        Err(CollaboratorError::not_configured(
            "travel pipeline (set MCP_PIPELINE_URL)",
        ))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
