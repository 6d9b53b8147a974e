//! Tool handler contract.
//!
//! Each tool is a [`ToolHandler`]: it publishes an immutable
//! [`ToolDescriptor`] and executes calls whose arguments already passed
//! schema validation in the dispatcher.

use std::sync::Arc;

use rmcp::model::{CallToolRequestParam, Tool};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::error::ToolError;
use super::response::ToolResponse;
use super::schema::SchemaNode;

/// A single tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    /// The name of the tool to execute.
    pub name: String,

    /// The arguments to pass to the tool.
    pub arguments: Map<String, Value>,
}

impl ToolCallRequest {
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Build a request from a JSON value.
    ///
    /// `null` means no arguments; any other non-object is rejected.
    pub fn from_value(name: impl Into<String>, arguments: Value) -> Result<Self, ToolError> {
        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(ToolError::invalid_argument("arguments", "object")),
        };
        Ok(Self::new(name, arguments))
    }
}

impl From<CallToolRequestParam> for ToolCallRequest {
    fn from(param: CallToolRequestParam) -> Self {
        Self {
            name: param.name.into_owned(),
            arguments: param.arguments.unwrap_or_default(),
        }
    }
}

/// Metadata describing a callable tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: SchemaNode,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: SchemaNode,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Create a Tool model for this descriptor (metadata).
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone().into(),
            description: Some(self.description.clone().into()),
            input_schema: Arc::new(self.input_schema.to_json()),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// JSON form used by the HTTP transport.
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": Value::Object(self.input_schema.to_json()),
        })
    }
}

/// Trait implemented by every tool.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Metadata for this tool. Called once, at registration.
    fn descriptor(&self) -> ToolDescriptor;

    /// Execute the tool with validated arguments.
    async fn call(&self, arguments: Map<String, Value>) -> Result<ToolResponse, ToolError>;
}

/// Deserialize validated arguments into a tool's parameter struct.
pub fn parse_arguments<T: DeserializeOwned>(
    arguments: Map<String, Value>,
) -> Result<T, ToolError> {
    serde_json::from_value(Value::Object(arguments))
        .map_err(|e| ToolError::internal(format!("arguments do not match parameters: {}", e)))
}
