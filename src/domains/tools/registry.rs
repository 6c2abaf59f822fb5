//! Tool Registry - the immutable name → definition table.
//!
//! Built once at startup and shared behind an `Arc`; both the rmcp handler
//! and the HTTP transport list and look up tools through it.

use rmcp::model::Tool;
use std::collections::HashMap;
use tracing::{debug, warn};

use super::ToolDefinition;
use super::definitions;

/// Tool registry - every tool the server exposes.
#[derive(Debug)]
pub struct ToolRegistry {
    tools: Vec<ToolDefinition>,
    index: HashMap<String, usize>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Registry holding the full Holded catalog.
    pub fn new() -> Self {
        Self::from_definitions(definitions::all())
    }

    /// Registry holding exactly `definitions`, in order.
    ///
    /// A later definition with an already registered name is ignored.
    pub fn from_definitions(definitions: Vec<ToolDefinition>) -> Self {
        let mut tools = Vec::with_capacity(definitions.len());
        let mut index = HashMap::with_capacity(definitions.len());

        for definition in definitions {
            if index.contains_key(definition.name()) {
                warn!("Duplicate tool definition ignored: {}", definition.name());
                continue;
            }
            index.insert(definition.name().to_string(), tools.len());
            tools.push(definition);
        }

        debug!(count = tools.len(), "Tool registry built");
        Self { tools, index }
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Get all tools as Tool models (metadata) for `tools/list`.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|t| t.tool().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
