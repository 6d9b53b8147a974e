//! Tool call dispatch.
//!
//! Single entry point for `tools/call` on every transport: looks the tool up,
//! validates arguments against its schema, then runs its handler.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, instrument, warn};

use super::error::ToolError;
use super::handlers::ToolCallRequest;
use super::registry::ToolRegistry;
use super::response::ToolResponse;

/// Routes tool calls to registered handlers.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Dispatch a call. Resolves to exactly one response or one error.
    ///
    /// Unknown tools and invalid arguments are rejected before any
    /// collaborator is touched.
    #[instrument(skip_all, fields(tool = %request.name))]
    pub async fn dispatch(&self, request: ToolCallRequest) -> Result<ToolResponse, ToolError> {
        let ToolCallRequest { name, arguments } = request;

        let Some((descriptor, handler)) = self.registry.get(&name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::unknown_tool(name));
        };

        if let Err(e) = descriptor.input_schema.validate(&arguments) {
            warn!("Rejected call to {}: {}", name, e);
            return Err(e);
        }

        let started = Instant::now();
        let result = handler.call(arguments).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(elapsed_ms, "Tool call completed"),
            Err(e) if e.is_client_error() => warn!(elapsed_ms, error = %e, "Tool call rejected"),
            Err(e) => error!(elapsed_ms, error = %e, "Tool call failed"),
        }

        result
    }
}
