//! Tool registry - resolves tool names to live tools
//!
//! `transfer_to_*` names build routing tools; `tool_*` names build
//! externally-backed tools whose service is found in the service manifest.

use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::config::{ServiceConfig, ToolConfig};
use crate::core::{ComponentClass, Registry, Result, SwitchboardError};
use crate::tools::routing::RoutingTool;
use crate::tools::service::{ServiceSettings, ServiceTool};
use crate::tools::services::{pascal_case, ServiceManifest};
use crate::tools::Tool;

/// Name prefix of routing tools
pub const ROUTING_PREFIX: &str = "transfer_to_";
/// Name prefix of externally-backed tools
pub const SERVICE_PREFIX: &str = "tool_";

/// Class a tool name implies when the configuration does not say
pub fn infer_class(name: &str) -> ComponentClass {
    if name.starts_with(ROUTING_PREFIX) {
        ComponentClass::Routing
    } else if name.starts_with(SERVICE_PREFIX) {
        ComponentClass::Service
    } else {
        ComponentClass::Agent
    }
}

/// Registry of available tools
pub struct ToolRegistry {
    registry: Registry,
    manifest: ServiceManifest,
    services: BTreeMap<String, ServiceConfig>,
}

impl ToolRegistry {
    /// Create an empty registry backed by `manifest`
    pub fn new(manifest: ServiceManifest) -> Self {
        Self {
            registry: Registry::new("tool"),
            manifest,
            services: BTreeMap::new(),
        }
    }

    /// Register every tool declared in `tools`, with their service sections
    pub fn from_config(
        tools: &BTreeMap<String, ToolConfig>,
        services: &BTreeMap<String, ServiceConfig>,
        manifest: ServiceManifest,
    ) -> Self {
        let mut registry = Self::new(manifest);
        for (name, tool) in tools {
            let class = tool.class.unwrap_or_else(|| infer_class(name));
            registry.register(name, class, &tool.description);
        }
        registry.services = services.clone();
        info!(tools = ?registry.registry.names(), "Registered tools");
        registry
    }

    /// Register a tool, replacing any earlier registration
    pub fn register(&mut self, name: &str, class: ComponentClass, description: &str) {
        self.registry
            .register(name, class, json!({ "description": description }));
    }

    /// Set the endpoint section used when `name`'s service is constructed
    pub fn configure_service(&mut self, name: impl Into<String>, config: ServiceConfig) {
        self.services.insert(name.into(), config);
    }

    /// Build a fresh instance of the named tool
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Tool>> {
        let entry = self.registry.entry(name)?;
        let description = entry.config_str("description").unwrap_or_default();

        if name.starts_with(ROUTING_PREFIX) {
            if entry.class != ComponentClass::Routing {
                return Err(SwitchboardError::InvalidClass {
                    name: name.to_string(),
                    class: entry.class.to_string(),
                });
            }
            debug!(tool = name, "Resolved routing tool");
            return Ok(Arc::new(RoutingTool::new(name, description)));
        }

        if let Some(rest) = name.strip_prefix(SERVICE_PREFIX) {
            if entry.class != ComponentClass::Service {
                return Err(SwitchboardError::InvalidClass {
                    name: name.to_string(),
                    class: entry.class.to_string(),
                });
            }

            let type_name = pascal_case(rest);
            let service_entry =
                self.manifest
                    .get(&type_name)
                    .ok_or_else(|| SwitchboardError::MissingService {
                        name: name.to_string(),
                        type_name: type_name.clone(),
                    })?;

            let settings =
                ServiceSettings::resolve(self.services.get(name), &service_entry.api_key_env);
            let service = service_entry.construct(&settings)?;

            debug!(tool = name, service = %type_name, "Resolved service tool");
            return Ok(Arc::new(ServiceTool::new(
                name,
                description,
                service_entry.schema.clone(),
                service,
            )));
        }

        Err(SwitchboardError::UnknownComponent(name.to_string()))
    }

    /// The set of registered tool names
    pub fn available(&self) -> HashSet<String> {
        self.registry.available()
    }

    /// Registered tool names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.registry.names()
    }
}
