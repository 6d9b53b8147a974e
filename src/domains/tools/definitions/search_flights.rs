//! Search flights tool definition.
//!
//! Builds a natural-language flight query and runs it through the SERP
//! search collaborator.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::domains::tools::bridge::BlockingBridge;
use crate::domains::tools::error::ToolError;
use crate::domains::tools::handlers::{ToolDescriptor, ToolHandler, parse_arguments};
use crate::domains::tools::response::ToolResponse;
use crate::domains::tools::schema::SchemaNode;
use crate::domains::travel::{SearchEngine, flight_query};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the search flights tool.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchFlightsParams {
    /// IATA origin code.
    pub origin: String,

    /// IATA destination code.
    pub destination: String,

    /// YYYY-MM-DD departure date.
    #[serde(default)]
    pub depart_date: Option<String>,

    /// Optional return date.
    #[serde(default)]
    pub return_date: Option<String>,
}

// ============================================================================
// Structured Output
// ============================================================================

/// Structured output for flight search results.
#[derive(Debug, Clone, Serialize)]
pub struct FlightSearchResult {
    pub query: String,
    pub results: Value,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Search flights tool - targeted flight availability search.
pub struct SearchFlightsTool {
    search: Arc<dyn SearchEngine>,
    bridge: BlockingBridge,
}

impl SearchFlightsTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "travel.search_flights";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Perform a targeted flight availability search using Bright Data SERP. Returns the parsed search response for downstream tooling.";

    /// Filename of the structured payload.
    pub const FILENAME: &'static str = "flight_search.json";

    /// Search engine used for flight lookups.
    pub const ENGINE: &'static str = "google";

    const COLLABORATOR: &'static str = "flight search";

    pub fn new(search: Arc<dyn SearchEngine>, bridge: BlockingBridge) -> Self {
        Self { search, bridge }
    }

    pub fn input_schema() -> SchemaNode {
        let origin = SchemaNode::string().describe("IATA origin code");
        let destination = SchemaNode::string().describe("IATA destination code");
        let depart_date = SchemaNode::string().describe("YYYY-MM-DD departure date");
        let return_date = SchemaNode::string().describe("Optional return date");

        SchemaNode::object()
            .required_property("origin", origin)
            .required_property("destination", destination)
            .property("depart_date", depart_date)
            .property("return_date", return_date)
    }

    pub fn to_descriptor() -> ToolDescriptor {
        ToolDescriptor::new(Self::NAME, Self::DESCRIPTION, Self::input_schema())
    }

    /// Execute the tool logic.
    #[instrument(skip_all, fields(origin = %params.origin, destination = %params.destination))]
    pub async fn execute(&self, params: SearchFlightsParams) -> Result<ToolResponse, ToolError> {
        let query = flight_query(
            &params.origin,
            &params.destination,
            params.depart_date.as_deref(),
            params.return_date.as_deref(),
        );
        info!("Search flights tool called: {}", query);

        let search = self.search.clone();
        let results = self
            .bridge
            .run_blocking(
                Self::COLLABORATOR,
                move |query: String| search.search(&query, Self::ENGINE),
                query.clone(),
            )
            .await?;

        let summary = format!("Flight SERP query executed: {}", query);
        let result = FlightSearchResult { query, results };
        ToolResponse::assemble(summary, &result, Self::FILENAME)
    }
}

#[async_trait::async_trait]
impl ToolHandler for SearchFlightsTool {
    fn descriptor(&self) -> ToolDescriptor {
        Self::to_descriptor()
    }

    async fn call(&self, arguments: Map<String, Value>) -> Result<ToolResponse, ToolError> {
        let params: SearchFlightsParams = parse_arguments(arguments)?;
        self.execute(params).await
    }
}

// ============================================================================
// Tests
// ============================================================================
