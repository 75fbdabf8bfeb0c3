//! Tools module - tools the agents can call
//!
//! Contains the tool trait, the routing and externally-backed tool kinds,
//! the built-in REST services, and the tool registry.

use async_trait::async_trait;
use serde_json::Value;

use crate::core::{Result, ToolDefinition, ToolOutput};

pub mod registry;
pub mod routing;
pub mod service;
pub mod services;

pub use registry::ToolRegistry;
pub use routing::RoutingTool;
pub use service::{Service, ServiceSettings, ServiceTool};
pub use services::{ServiceEntry, ServiceManifest};

/// A tool the model can request
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the model calls the tool by
    fn name(&self) -> &str;

    /// Description shown to the model
    fn description(&self) -> &str;

    /// JSON Schema of the arguments
    fn schema(&self) -> &Value;

    /// Whether the provider must reject arguments outside the schema
    fn strict(&self) -> bool {
        true
    }

    /// Run the tool with decoded arguments
    async fn execute(&self, args: Value) -> Result<ToolOutput>;

    /// Spec handed to the model
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::function(
            self.name(),
            self.description(),
            self.schema().clone(),
            self.strict(),
        )
    }
}
