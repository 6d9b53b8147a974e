//! Plan trip tool definition.
//!
//! Runs the full travel research pipeline for a user question and returns the
//! synthesized answer plus the complete final pipeline state.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::domains::tools::bridge::BlockingBridge;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolDescriptor, ToolHandler, parse_arguments};
use crate::domains::tools::response::ToolResponse;
use crate::domains::tools::schema::SchemaNode;
use crate::domains::travel::{PipelineState, TravelPipeline};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the plan trip tool.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanTripParams {
    /// User travel request.
    pub question: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Plan trip tool - runs the travel research agent.
pub struct PlanTripTool {
    pipeline: Arc<dyn TravelPipeline>,
    bridge: BlockingBridge,
}

impl PlanTripTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "travel.plan_trip";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Run the full travel research agent and return a synthesized itinerary.";

    /// Filename of the structured payload.
    pub const FILENAME: &'static str = "plan_trip.json";

    /// Summary used when the pipeline produced no answer.
    pub const NO_RESPONSE: &'static str = "No response produced.";

    const COLLABORATOR: &'static str = "travel pipeline";

    pub fn new(pipeline: Arc<dyn TravelPipeline>, bridge: BlockingBridge) -> Self {
        Self { pipeline, bridge }
    }

    pub fn input_schema() -> SchemaNode {
        let question = SchemaNode::string().describe("User travel request");
        SchemaNode::object().required_property("question", question)
    }

    pub fn to_descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION, Self::input_schema())
    }

    /// Execute the tool logic.
    #[instrument(skip_all)]
    pub async fn execute(&self, params: PlanTripParams) -> Result<ToolResponse, ToolError> {
        info!("Plan trip tool called ({} chars)", params.question.len());

        let state = PipelineState::new(params.question);
        let pipeline = self.pipeline.clone();
        let result = self
            .bridge
            .run_blocking(
                Self::COLLABORATOR,
                move |state: PipelineState| pipeline.invoke(state),
                state,
            )
            .await?;

        let summary = final_answer_text(&result);
        info!("Travel pipeline returned {} fields", result.len());

        ToolResponse::assemble(summary, &result, Self::FILENAME)
    }
}

#[async_trait::async_trait]
impl ToolHandler for PlanTripTool {
    fn descriptor(&self) -> ToolDescriptor {
        Self::to_descriptor()
    }

    async fn call(&self, arguments: Map<String, Value>) -> Result<ToolResponse, ToolError> {
        let params: PlanTripParams = parse_arguments(arguments)?;
        self.execute(params).await
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Text summary for a pipeline result: the final answer when it is truthy,
/// the fixed fallback otherwise.
fn final_answer_text(result: &Map<String, Value>) -> String {
    match result.get("final_answer") {
        Some(Value::String(answer)) if !answer.is_empty() => answer.clone(),
        Some(other) if is_truthy(other) => other.to_string(),
        _ => PlanTripTool::NO_RESPONSE.to_string(),
    }
}

/// Truthiness of a JSON value: `null`, `false`, zero and empty
/// strings/arrays/objects are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

// ============================================================================
// Tests
// ============================================================================
