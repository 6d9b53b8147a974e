//! MCP server handler.
//!
//! `McpServer` owns the tool registry and the dispatcher. The rmcp
//! `ServerHandler` impl (STDIO / TCP) and the HTTP helper methods both route
//! through the same [`Dispatcher`], so every transport validates and executes
//! tool calls identically.

use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::config::Config;
use super::error::Result;
use crate::domains::tools::{Dispatcher, ToolCallRequest, ToolError, ToolRegistry, ToolResponse};
use crate::domains::travel::Collaborators;

const INSTRUCTIONS: &str = "Travel planning tools. travel.plan_trip answers a free-form travel \
    question; travel.search_flights runs a flight search between two airports.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tools exposed by this server, built once at startup.
    registry: Arc<ToolRegistry>,

    /// Validates and executes tool calls against `registry`.
    dispatcher: Dispatcher,
}

impl McpServer {
    /// Create a server whose collaborators are built from `config`.
    pub fn new(config: Config) -> Result<Self> {
        let collaborators = Collaborators::from_config(&config);
        Self::with_collaborators(config, collaborators)
    }

    /// Create a server around explicit collaborators.
    pub fn with_collaborators(config: Config, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;

        let bridge = config.blocking.bridge();
        let registry = Arc::new(ToolRegistry::travel(&collaborators, bridge)?);

        info!(
            tools = ?registry.tool_names(),
            strategy = ?bridge.strategy(),
            "Tool registry initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            dispatcher: Dispatcher::new(registry.clone()),
            registry,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Validate and execute a tool call.
    pub async fn dispatch(
        &self,
        request: ToolCallRequest,
    ) -> std::result::Result<ToolResponse, ToolError> {
        self.dispatcher.dispatch(request).await
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools as JSON descriptors (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.registry
            .list_tools()
            .iter()
            .map(|descriptor| descriptor.to_json())
            .collect()
    }

    /// Call a tool by name and return the serialized `CallToolResult`
    /// (for HTTP transport).
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, ToolError> {
        let request = ToolCallRequest::from_value(name, arguments)?;
        let response = self.dispatch(request).await?;
        let result = CallToolResult::from(response);
        serde_json::to_value(result).map_err(ToolError::Serialization)
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name().to_string(),
                version: self.version().to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    #[instrument(skip(self, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        info!("Listing tools");
        Ok(ListToolsResult {
            tools: self.registry.to_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request = ToolCallRequest::from(request);

        // A cancelled request drops the dispatch future; a collaborator
        // already running on a worker is left to finish on its own.
        tokio::select! {
            result = self.dispatch(request) => result
                .map(CallToolResult::from)
                .map_err(McpError::from),
            _ = context.ct.cancelled() => {
                warn!("Tool call cancelled by client");
                Err(McpError::internal_error("request cancelled", None))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Error;
    use crate::domains::tools::test_support::{FakePipeline, FakeSearch, collaborators};
    use rmcp::ServiceExt;
    use serde_json::{Value, json};
    use std::time::Duration;
    use tokio::io::{
        AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines, ReadHalf, WriteHalf,
    };
    use tokio_test::{assert_err, assert_ok};

    fn server(pipeline: FakePipeline, search: FakeSearch) -> McpServer {
        let wired = collaborators(pipeline, search);
        McpServer::with_collaborators(Config::default(), wired).unwrap()
    }

    /// Client end of an in-memory rmcp session speaking line-delimited JSON-RPC.
    struct Session {
        lines: Lines<BufReader<ReadHalf<DuplexStream>>>,
        writer: WriteHalf<DuplexStream>,
    }

    impl Session {
        async fn open(server: McpServer) -> Self {
            let (client_io, server_io) = tokio::io::duplex(64 * 1024);
            tokio::spawn(async move {
                if let Ok(service) = server.serve(server_io).await {
                    let _ = service.waiting().await;
                }
            });

            let (reader, writer) = tokio::io::split(client_io);
            let mut session = Self {
                lines: BufReader::new(reader).lines(),
                writer,
            };
            session.initialize().await;
            session
        }

        async fn send(&mut self, message: Value) {
            let line = format!("{}\n", message);
            self.writer.write_all(line.as_bytes()).await.unwrap();
        }

        async fn receive(&mut self) -> Value {
            let line = tokio::time::timeout(Duration::from_secs(5), self.lines.next_line())
                .await
                .expect("no reply from server")
                .unwrap()
                .expect("server closed the stream");
            serde_json::from_str(&line).unwrap()
        }

        async fn initialize(&mut self) {
            let request = json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "itinerary-client", "version": "0.1.0" }
                }
            });
            self.send(request).await;

            let reply = self.receive().await;
            assert_eq!(reply["id"], 1);
            assert_eq!(reply["result"]["serverInfo"]["name"], "travel-agent");
            assert!(reply["result"]["capabilities"]["tools"].is_object());

            let initialized = json!({ "jsonrpc": "2.0", "method": "notifications/initialized" });
            self.send(initialized).await;
        }

        async fn call(&mut self, id: u64, name: &str, arguments: Value) {
            let request = json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": "tools/call",
                "params": { "name": name, "arguments": arguments }
            });
            self.send(request).await;
        }
    }

    #[test]
    fn test_server_identity_from_config() {
        let server = server(FakePipeline::echo(), FakeSearch::new());
        assert_eq!(server.name(), "travel-agent");
        assert_eq!(server.version(), env!("CARGO_PKG_VERSION"));

        let info = server.get_info();
        assert_eq!(info.server_info.name, "travel-agent");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
    }

    #[test]
    fn test_list_tools_json() {
        let server = server(FakePipeline::echo(), FakeSearch::new());
        let tools = server.list_tools();

        let names: Vec<&str> = tools
            .iter()
            .filter_map(|tool| tool["name"].as_str())
            .collect();
        assert_eq!(names, vec!["travel.plan_trip", "travel.search_flights"]);

        for tool in &tools {
            assert!(tool["description"].as_str().is_some());
            assert_eq!(tool["inputSchema"]["type"], "object");
        }
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["question"]));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.blocking.timeout_secs = Some(0);

        let wired = collaborators(FakePipeline::echo(), FakeSearch::new());
        let result = McpServer::with_collaborators(config, wired);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_call_tool_returns_text_then_resource() {
        let server = server(FakePipeline::echo(), FakeSearch::new());

        let question = json!({ "question": "Plan a 3-day trip to Tokyo" });
        let result = assert_ok!(server.call_tool("travel.plan_trip", question).await);

        let content = result["content"].as_array().unwrap();
        assert_eq!(content.len(), 2);
        assert_eq!(content[0]["type"], "text");
        let text = content[0]["text"].as_str();
        assert_eq!(text, Some("Answer to: Plan a 3-day trip to Tokyo"));
        assert_eq!(content[1]["type"], "resource");
        assert_eq!(
            content[1]["resource"]["uri"],
            "travel://results/plan_trip.json"
        );
        assert_eq!(content[1]["resource"]["mimeType"], "application/json");
    }

    #[tokio::test]
    async fn test_call_tool_unknown_name() {
        let pipeline = FakePipeline::echo();
        let server = server(pipeline.clone(), FakeSearch::new());

        let err = assert_err!(server.call_tool("travel.book_hotel", json!({})).await);
        assert_eq!(err.to_string(), "Unsupported tool: travel.book_hotel");
        assert_eq!(pipeline.calls(), 0);
    }

    #[tokio::test]
    async fn test_call_tool_rejects_non_object_arguments() {
        let server = server(FakePipeline::echo(), FakeSearch::new());

        let tokyo = json!(["Tokyo"]);
        let err = assert_err!(server.call_tool("travel.plan_trip", tokyo).await);
        assert_eq!(
            err.to_string(),
            "Invalid argument 'arguments': expected object"
        );
    }

    #[tokio::test]
    async fn test_call_tool_null_arguments_reports_missing_field() {
        let server = server(FakePipeline::echo(), FakeSearch::new());

        let no_args = Value::Null;
        let err = assert_err!(server.call_tool("travel.search_flights", no_args).await);
        assert_eq!(err.to_string(), "Missing required argument: origin");
    }

    #[tokio::test]
    async fn test_collaborator_failure_maps_to_internal_error() {
        let pipeline = FakePipeline::failing("graph exploded");
        let server = server(pipeline, FakeSearch::new());

        let question = json!({ "question": "Lisbon in May?" });
        let err = assert_err!(server.call_tool("travel.plan_trip", question).await);
        assert!(matches!(err, ToolError::CollaboratorFailure { .. }));

        let mcp = McpError::from(err);
        assert_eq!(mcp.code, ErrorCode::INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_session_lists_and_calls_tools() {
        let server = server(FakePipeline::echo(), FakeSearch::new());
        let mut session = Session::open(server).await;

        let list = json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" });
        session.send(list).await;
        let listed = session.receive().await;
        assert_eq!(listed["id"], 2);
        let tools = listed["result"]["tools"].as_array().unwrap();
        assert_eq!(tools[0]["name"], "travel.plan_trip");
        assert_eq!(tools[1]["name"], "travel.search_flights");
        assert_eq!(tools[1]["inputSchema"]["type"], "object");

        let route = json!({ "origin": "SFO", "destination": "NRT" });
        session.call(3, "travel.search_flights", route).await;
        let reply = session.receive().await;
        assert_eq!(reply["id"], 3);
        let content = reply["result"]["content"].as_array().unwrap();
        assert_eq!(
            content[0]["text"],
            "Flight SERP query executed: flights from SFO to NRT"
        );
        assert_eq!(
            content[1]["resource"]["uri"],
            "travel://results/flight_search.json"
        );
    }

    #[tokio::test]
    async fn test_session_missing_argument_is_invalid_params() {
        let server = server(FakePipeline::echo(), FakeSearch::new());
        let mut session = Session::open(server).await;

        session.call(2, "travel.plan_trip", json!({})).await;
        let reply = session.receive().await;
        assert_eq!(reply["id"], 2);
        assert_eq!(reply["error"]["code"], -32602);
        assert_eq!(reply["error"]["data"]["field"], "question");
    }

    #[tokio::test]
    async fn test_session_cancelled_call_gets_error_reply() {
        let (pipeline, release) = FakePipeline::gated();
        let server = server(pipeline.clone(), FakeSearch::new());
        let mut session = Session::open(server).await;

        let question = json!({ "question": "Kyoto in autumn" });
        session.call(7, "travel.plan_trip", question).await;
        tokio::time::timeout(Duration::from_secs(5), pipeline.wait_started())
            .await
            .expect("pipeline never started");

        let cancel = json!({
            "jsonrpc": "2.0",
            "method": "notifications/cancelled",
            "params": { "requestId": 7, "reason": "user aborted" }
        });
        session.send(cancel).await;

        let reply = session.receive().await;
        assert_eq!(reply["id"], 7);
        assert_eq!(reply["error"]["code"], -32603);
        assert_eq!(reply["error"]["message"], "request cancelled");

        release.send(()).unwrap();
    }
}
