//! Tool Registry - central registration of all tools.
//!
//! The registry is populated once at startup and then shared read-only
//! (behind an `Arc`) by the server, every transport and every in-flight call.
//! Listing never takes a lock and never fails.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::Tool;
use tracing::info;

use super::bridge::BlockingBridge;
use super::definitions::{PlanTripTool, SearchFlightsTool};
use super::error::ToolError;
use super::handlers::{ToolDescriptor, ToolHandler};
use crate::domains::travel::Collaborators;

/// Tool registry - holds descriptors in registration order and the handler
/// for each name.
#[derive(Default)]
pub struct ToolRegistry {
    descriptors: Vec<ToolDescriptor>,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the registry with all travel tools.
    ///
    /// This is the central place where tools are registered.
    pub fn travel(
        collaborators: &Collaborators,
        bridge: BlockingBridge,
    ) -> Result<Self, ToolError> {
        let plan_trip = PlanTripTool::new(collaborators.pipeline.clone(), bridge);
        let search_flights = SearchFlightsTool::new(collaborators.search.clone(), bridge);

        let mut registry = Self::new();
        registry.register(Arc::new(plan_trip))?;
        registry.register(Arc::new(search_flights))?;
        Ok(registry)
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> Result<(), ToolError> {
        let descriptor = handler.descriptor();
        if self.handlers.contains_key(&descriptor.name) {
            return Err(ToolError::DuplicateTool(descriptor.name));
        }

        info!("Registering tool: {}", descriptor.name);
        self.handlers.insert(descriptor.name.clone(), handler);
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// All tool descriptors, in registration order.
    pub fn list_tools(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<(&ToolDescriptor, &Arc<dyn ToolHandler>)> {
        let handler = self.handlers.get(name)?;
        let descriptor = self.descriptors.iter().find(|d| d.name == name)?;
        Some((descriptor, handler))
    }

    /// Get all tools as Tool models (metadata).
    pub fn to_tools(&self) -> Vec<Tool> {
        self.descriptors
            .iter()
            .map(ToolDescriptor::to_tool)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::test_support::{FakePipeline, FakeSearch, collaborators};
    use std::collections::HashSet;

    fn travel_registry() -> ToolRegistry {
        let wired = collaborators(FakePipeline::echo(), FakeSearch::new());
        ToolRegistry::travel(&wired, BlockingBridge::default()).unwrap()
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = travel_registry();
        assert_eq!(
            registry.tool_names(),
            vec!["travel.plan_trip", "travel.search_flights"]
        );
    }

    #[test]
    fn test_names_are_distinct_and_stable() {
        let registry = travel_registry();
        let first = registry.tool_names();
        let unique: HashSet<_> = first.iter().collect();
        assert_eq!(unique.len(), first.len());

        for _ in 0..10 {
            assert_eq!(registry.tool_names(), first);
        }
    }

    #[test]
    fn test_empty_registry_lists_nothing() {
        let registry = ToolRegistry::new();
        assert!(registry.list_tools().is_empty());
        assert!(registry.is_empty());
        assert!(registry.get("travel.plan_trip").is_none());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = travel_registry();
        let pipeline = Arc::new(FakePipeline::echo());
        let duplicate = PlanTripTool::new(pipeline, BlockingBridge::default());
        match registry.register(Arc::new(duplicate)) {
            Err(ToolError::DuplicateTool(name)) => assert_eq!(name, "travel.plan_trip"),
            other => panic!("Expected DuplicateTool, got {:?}", other),
        }
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_plan_trip_schema() {
        let registry = travel_registry();
        let (descriptor, _) = registry.get("travel.plan_trip").unwrap();
        let schema = &descriptor.input_schema;
        assert_eq!(schema.required(), ["question"]);
        assert!(schema.properties().contains_key("question"));
    }

    #[test]
    fn test_search_flights_schema() {
        let registry = travel_registry();
        let (descriptor, _) = registry.get("travel.search_flights").unwrap();
        let schema = &descriptor.input_schema;
        assert_eq!(schema.required(), ["origin", "destination"]);
        let properties: Vec<_> = schema.properties().keys().map(String::as_str).collect();
        assert_eq!(
            properties,
            vec!["depart_date", "destination", "origin", "return_date"]
        );
    }

    #[test]
    fn test_to_tools_matches_descriptors() {
        let registry = travel_registry();
        let tools = registry.to_tools();
        assert_eq!(tools.len(), registry.len());
        for (tool, descriptor) in tools.iter().zip(registry.list_tools()) {
            assert_eq!(tool.name, descriptor.name.as_str());
        }
    }
}
