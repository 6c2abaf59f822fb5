//! Tools domain module.
//!
//! Tools are the operations MCP clients can call. Each one maps validated
//! arguments to a single Holded API call, sometimes followed by trimming or
//! paging of the response.
//!
//! ## Architecture
//!
//! - `definitions/` - Tool definitions, one module per resource family
//! - `definition.rs` - `ToolDefinition`: metadata plus type-erased handler
//! - `registry.rs` - Immutable name → definition table
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Write a params struct deriving `Deserialize` and `JsonSchema`
//! 2. Write an async handler `(Arc<dyn ApiClient>, Params) -> ToolResult<Value>`
//! 3. Add a `ToolDefinition::new(...)` entry to the family's `tools()`

mod definition;
pub mod definitions;
mod error;
mod registry;

pub use definition::{ToolDefinition, ToolKind};
pub use error::{ToolError, ToolResult};
pub use registry::ToolRegistry;
