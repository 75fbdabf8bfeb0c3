//! Configuration management for Switchboard
//!
//! Supports environment variables, config files, and runtime overrides.
//! The file declares the model endpoint, the orchestrator settings, and the
//! tools, agents and service endpoints the registries are populated from.
//!
//! Config file location: ~/.config/switchboard/config.toml

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Result, SwitchboardError};
use crate::core::registry::ComponentClass;

/// Main configuration for Switchboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Model endpoint configuration
    #[serde(default)]
    pub model: ModelConfig,
    /// Triage and routing configuration
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    /// Tool declarations, keyed by tool name
    #[serde(default = "default_tools")]
    pub tools: BTreeMap<String, ToolConfig>,
    /// Agent declarations, keyed by agent name
    #[serde(default = "default_agents")]
    pub agents: BTreeMap<String, AgentConfig>,
    /// Per-tool service endpoint settings, keyed by tool name
    #[serde(default)]
    pub services: BTreeMap<String, ServiceConfig>,
}

/// OpenAI-compatible chat completion endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Base URL up to and including the API version segment
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Bearer token; falls back to OPENAI_API_KEY. Read but never written back.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token limit
    pub max_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini-2024-07-18".to_string(),
            api_key: None,
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: 60,
        }
    }
}

/// Triage and routing behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Entry-point agent every request goes through
    pub triage_agent: String,
    /// Prefix stripped from a routing decision to get the agent name
    pub route_prefix: String,
    /// Routing decision meaning "nobody can handle this"
    pub unsupported_route: String,
    /// Maximum tool round-trips per agent run
    pub max_round_trips: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            triage_agent: "agent_triage".to_string(),
            route_prefix: "transfer_to_".to_string(),
            unsupported_route: "transfer_to_unsupported".to_string(),
            max_round_trips: 10,
        }
    }
}

/// Declaration of one tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Description shown to the model
    pub description: String,
    /// Component class; inferred from the name prefix when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<ComponentClass>,
}

impl ToolConfig {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            class: None,
        }
    }
}

/// Declaration of one agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// System prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Names of the tools bound to this agent, in order
    #[serde(default)]
    pub tools: Vec<String>,
}

impl AgentConfig {
    pub fn new(instructions: impl Into<String>, tools: &[&str]) -> Self {
        Self {
            instructions: Some(instructions.into()),
            tools: tools.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Endpoint settings for an externally-backed tool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Override of the upstream base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Inline API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable holding the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Request timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_tools() -> BTreeMap<String, ToolConfig> {
    [
        (
            "transfer_to_agent_weather",
            "Transfer to the weather agent for weather forecasts of a city over a date range.",
        ),
        (
            "transfer_to_agent_currency",
            "Transfer to the currency agent for converting an amount between currencies.",
        ),
        (
            "transfer_to_agent_places",
            "Transfer to the places agent for restaurants, sights and things to do in a city.",
        ),
        (
            "transfer_to_unsupported",
            "Use when the request is not about weather, currency or places.",
        ),
        (
            "tool_weather_forecast",
            "Get the daily weather forecast for a city between two dates.",
        ),
        (
            "tool_currency",
            "Convert an amount from one currency to another at the current rate.",
        ),
        (
            "tool_places",
            "Find top-rated places of interest in a city for the given categories.",
        ),
    ]
    .into_iter()
    .map(|(name, description)| (name.to_string(), ToolConfig::new(description)))
    .collect()
}

fn default_agents() -> BTreeMap<String, AgentConfig> {
    let mut agents = BTreeMap::new();
    agents.insert(
        "agent_triage".to_string(),
        AgentConfig::new(
            "You are a travel assistant's triage desk. Decide which specialist should \
             handle the user's request and call the matching transfer tool. If the \
             request is unclear, ask a short clarifying question instead.",
            &[
                "transfer_to_agent_weather",
                "transfer_to_agent_currency",
                "transfer_to_agent_places",
                "transfer_to_unsupported",
            ],
        ),
    );
    agents.insert(
        "agent_weather".to_string(),
        AgentConfig::new(
            "You provide weather forecasts. Use the forecast tool with the city and \
             dates (YYYY-MM-DD) from the conversation, then summarise the result. Ask \
             for any missing city or dates.",
            &["tool_weather_forecast"],
        ),
    );
    agents.insert(
        "agent_currency".to_string(),
        AgentConfig::new(
            "You convert currencies. Use the currency tool with the amount and currency \
             codes from the conversation, then report the converted amount and rate.",
            &["tool_currency"],
        ),
    );
    agents.insert(
        "agent_places".to_string(),
        AgentConfig::new(
            "You recommend places to visit. Use the places tool with the city and the \
             categories the user is interested in, then present the best options with \
             their typical cost.",
            &["tool_places"],
        ),
    );
    agents
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            tools: default_tools(),
            agents: default_agents(),
            services: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("switchboard")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => {
                let default_path = Self::config_file();
                if default_path.exists() {
                    Self::load_from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a file only
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SwitchboardError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply OPENAI_MODEL / OPENAI_BASE_URL / OPENAI_API_KEY
    pub fn apply_env_overrides(&mut self) {
        if let Ok(model) = env::var("OPENAI_MODEL") {
            self.model.model = model;
        }
        if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
            self.model.base_url = base_url;
        }
        if self.model.api_key.is_none() {
            self.model.api_key = env::var("OPENAI_API_KEY").ok();
        }
    }

    /// Save configuration to the default location and return the path
    pub fn save(&self) -> Result<PathBuf> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).map_err(|e| {
                SwitchboardError::config(format!("Failed to create config dir: {}", e))
            })?;
        }

        fs::write(&config_path, self.to_toml()?)?;
        Ok(config_path)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SwitchboardError::config(format!("Failed to serialize config: {}", e)))
    }

    /// Set the model identifier
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.model.model = model.into();
    }
}
