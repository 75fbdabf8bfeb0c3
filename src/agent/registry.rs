//! Agent registry - resolves agent names to configured agents
//!
//! Each agent's tools are resolved through the tool registry when the agent
//! is resolved.

use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::agent::engine::{Agent, DEFAULT_MAX_ROUND_TRIPS};
use crate::core::config::AgentConfig;
use crate::core::{ComponentClass, Config, Registry, Result, SwitchboardError};
use crate::tools::{ServiceManifest, Tool, ToolRegistry};

/// Registry of available agents
pub struct AgentRegistry {
    registry: Registry,
    tools: Arc<ToolRegistry>,
    max_round_trips: usize,
}

impl AgentRegistry {
    /// Create an empty registry whose agents bind tools from `tools`
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self {
            registry: Registry::new("agent"),
            tools,
            max_round_trips: DEFAULT_MAX_ROUND_TRIPS,
        }
    }

    /// Register every tool and agent declared in `config`, using the
    /// built-in services
    pub fn from_config(config: &Config) -> Self {
        Self::from_config_with_manifest(config, ServiceManifest::builtin())
    }

    /// Like [`from_config`](Self::from_config) with a caller-supplied manifest
    pub fn from_config_with_manifest(config: &Config, manifest: ServiceManifest) -> Self {
        let tools = ToolRegistry::from_config(&config.tools, &config.services, manifest);

        let mut registry = Self::new(Arc::new(tools))
            .with_max_round_trips(config.orchestrator.max_round_trips);
        for (name, agent) in &config.agents {
            registry.register_agent(name, agent);
        }
        info!(agents = ?registry.names(), "Registered agents");
        registry
    }

    /// Set the round-trip bound given to resolved agents
    pub fn with_max_round_trips(mut self, max_round_trips: usize) -> Self {
        self.max_round_trips = max_round_trips;
        self
    }

    /// Register a component under `name`, replacing any earlier registration
    pub fn register(&mut self, name: &str, class: ComponentClass, config: Value) {
        self.registry.register(name, class, config);
    }

    /// Register an agent declaration
    pub fn register_agent(&mut self, name: &str, agent: &AgentConfig) {
        self.register(
            name,
            ComponentClass::Agent,
            json!({
                "instructions": agent.instructions,
                "tools": agent.tools,
            }),
        );
    }

    /// Build a fresh, configured instance of the named agent
    pub fn resolve(&self, name: &str) -> Result<Agent> {
        let entry = self.registry.entry(name)?;
        if entry.class != ComponentClass::Agent {
            return Err(SwitchboardError::UnknownComponent(name.to_string()));
        }

        let tool_names: Vec<&str> = entry
            .config
            .get("tools")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let tools = tool_names
            .iter()
            .map(|tool| self.tools.resolve(tool))
            .collect::<Result<Vec<Arc<dyn Tool>>>>()?;

        let mut agent = Agent::new(name)
            .with_tools(tools)
            .with_max_round_trips(self.max_round_trips);
        if let Some(instructions) = entry.config_str("instructions") {
            agent = agent.with_instructions(instructions);
        }

        debug!(agent = name, tools = ?tool_names, "Resolved agent");
        Ok(agent)
    }

    /// The tool registry agents bind from
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// The set of registered agent names
    pub fn available(&self) -> HashSet<String> {
        self.registry.available()
    }

    /// Registered agent names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.registry.names()
    }
}
