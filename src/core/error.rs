//! Custom error types for Switchboard
//!
//! Provides a unified error handling system across all modules.

use thiserror::Error;

/// Main error type for Switchboard operations
#[derive(Error, Debug)]
pub enum SwitchboardError {
    /// Model endpoint errors (bad status, malformed completion)
    #[error("Model error: {0}")]
    Model(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A name was resolved that was never registered
    #[error("{kind} not registered: {name}")]
    NotRegistered { kind: &'static str, name: String },

    /// The registered class does not match what the name's prefix requires
    #[error("Invalid class for {name}: {class}")]
    InvalidClass { name: String, class: String },

    /// A name that matches no resolution rule
    #[error("Unknown component type for {0}")]
    UnknownComponent(String),

    /// No service/schema pair in the manifest for an externally-backed tool
    #[error("No service found for tool {name} (expected {type_name}Service and {type_name}Schema)")]
    MissingService { name: String, type_name: String },

    /// Agent has no instruction text
    #[error("Agent {0} not properly configured - missing instructions")]
    MissingInstructions(String),

    /// Model asked for a tool the agent does not have
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Agent kept requesting tools past its bound
    #[error("Agent {agent} exceeded the limit of {limit} tool round-trips")]
    RoundTripLimit { agent: String, limit: usize },

    /// A message mapping is missing required fields
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// JSON parsing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for Switchboard operations
pub type Result<T> = std::result::Result<T, SwitchboardError>;

impl SwitchboardError {
    /// Create a model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid message error
    pub fn invalid_message(msg: impl Into<String>) -> Self {
        Self::InvalidMessage(msg.into())
    }

    /// Short, stable name of the variant.
    ///
    /// Used as the `type` field of the error payload a failed tool call
    /// leaves in the conversation.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Model(_) => "ModelError",
            Self::Config(_) => "ConfigError",
            Self::NotRegistered { .. } => "NotRegistered",
            Self::InvalidClass { .. } => "InvalidClass",
            Self::UnknownComponent(_) => "UnknownComponent",
            Self::MissingService { .. } => "MissingService",
            Self::MissingInstructions(_) => "MissingInstructions",
            Self::UnknownTool(_) => "UnknownTool",
            Self::RoundTripLimit { .. } => "RoundTripLimit",
            Self::InvalidMessage(_) => "InvalidMessage",
            Self::Json(_) => "JsonError",
            Self::Toml(_) => "TomlError",
            Self::Http(_) => "HttpError",
            Self::Io(_) => "IoError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_registered_message() {
        let err = SwitchboardError::NotRegistered {
            kind: "tool",
            name: "tool_missing".to_string(),
        };
        assert_eq!(err.to_string(), "tool not registered: tool_missing");
        assert_eq!(err.kind(), "NotRegistered");
    }

    #[test]
    fn test_json_conversion() {
        let err: SwitchboardError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert_eq!(err.kind(), "JsonError");
    }
}
