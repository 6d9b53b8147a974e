//! Input schema declaration and validation.
//!
//! A [`SchemaNode`] describes the argument shape each tool accepts. It is
//! rendered to JSON Schema for `tools/list` and checked against incoming
//! arguments before any handler runs.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::error::ToolError;

/// Value types a schema node can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    Object,
    String,
}

impl SchemaType {
    /// JSON Schema name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::String => "string",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Object => value.is_object(),
            Self::String => value.is_string(),
        }
    }
}

/// Recursive description of an accepted argument shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    kind: SchemaType,
    properties: BTreeMap<String, SchemaNode>,
    required: Vec<String>,
    description: Option<String>,
}

impl SchemaNode {
    fn of(kind: SchemaType) -> Self {
        Self {
            kind,
            properties: BTreeMap::new(),
            required: Vec::new(),
            description: None,
        }
    }

    /// An object node with no properties yet.
    pub fn object() -> Self {
        Self::of(SchemaType::Object)
    }

    /// A string node.
    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    /// Attach a description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare an optional property. Only meaningful on object nodes.
    pub fn property(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        debug_assert_eq!(self.kind, SchemaType::Object);
        self.properties.insert(name.into(), node);
        self
    }

    /// Declare a required property. Only meaningful on object nodes.
    pub fn required_property(self, name: impl Into<String>, node: SchemaNode) -> Self {
        let name = name.into();
        let mut this = self.property(name.clone(), node);
        if !this.required.contains(&name) {
            this.required.push(name);
        }
        this
    }

    pub fn kind(&self) -> SchemaType {
        self.kind
    }

    pub fn properties(&self) -> &BTreeMap<String, SchemaNode> {
        &self.properties
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Render the node as a JSON Schema object.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut schema = Map::new();
        schema.insert("type".to_string(), Value::from(self.kind.as_str()));

        if let Some(description) = &self.description {
            schema.insert("description".to_string(), Value::from(description.as_str()));
        }

        if self.kind == SchemaType::Object {
            let properties = self
                .properties
                .iter()
                .map(|(name, node)| (name.clone(), Value::Object(node.to_json())))
                .collect();
            schema.insert("properties".to_string(), Value::Object(properties));
            schema.insert(
                "required".to_string(),
                Value::Array(self.required.iter().cloned().map(Value::from).collect()),
            );
        }

        schema
    }

    /// Check call arguments against this object schema.
    ///
    /// Required fields are checked for presence before any type check. A
    /// `null` value counts as absent; undeclared fields are ignored.
    pub fn validate(&self, arguments: &Map<String, Value>) -> Result<(), ToolError> {
        self.validate_at("", arguments)
    }

    fn validate_at(&self, path: &str, arguments: &Map<String, Value>) -> Result<(), ToolError> {
        for field in &self.required {
            if arguments.get(field).is_none_or(Value::is_null) {
                return Err(ToolError::missing_argument(join_path(path, field)));
            }
        }

        for (name, node) in &self.properties {
            let Some(value) = arguments.get(name).filter(|v| !v.is_null()) else {
                continue;
            };

            let field = join_path(path, name);
            if !node.kind.matches(value) {
                return Err(ToolError::invalid_argument(field, node.kind.as_str()));
            }

            if let Value::Object(nested) = value {
                node.validate_at(&field, nested)?;
            }
        }

        Ok(())
    }
}

fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", path, field)
    }
}
