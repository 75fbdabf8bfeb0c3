//! Shared types used across Switchboard modules
//!
//! Contains the chat message model, tool definitions, tool outputs and the
//! request/response envelope exchanged with callers of the orchestrator.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::error::{Result, SwitchboardError};

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A message in a conversation
///
/// Field names follow the chat-completions wire format so a message can be
/// read from and written back to a plain JSON mapping unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,
    /// Text content; `null` on assistant messages that only request tools
    #[serde(default)]
    pub content: Option<String>,
    /// Optional participant or tool name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Correlation id of the tool call this message answers (tool role only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Tool calls requested by the assistant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl Message {
    fn with_role(role: Role, content: Option<String>) -> Self {
        Self {
            role,
            content,
            name: None,
            tool_call_id: None,
            tool_calls: None,
        }
    }

    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, Some(content.into()))
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, Some(content.into()))
    }

    /// Create a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, Some(content.into()))
    }

    /// Create an assistant message that requests tool execution
    pub fn assistant_with_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        let mut message = Self::with_role(Role::Assistant, None);
        message.tool_calls = Some(tool_calls);
        message
    }

    /// Create the tool message answering `call`
    pub fn tool_result(call: &ToolCall, content: &Value) -> Self {
        let mut message = Self::with_role(Role::Tool, Some(content.to_string()));
        message.name = Some(call.function.name.clone());
        message.tool_call_id = Some(call.id.clone());
        message
    }

    /// Build a message from a plain JSON mapping
    pub fn from_value(value: Value) -> Result<Self> {
        let message: Message = serde_json::from_value(value)?;
        message.validate()?;
        Ok(message)
    }

    /// Serialize back to a plain JSON mapping
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Check the fields that must be present for the message's role
    pub fn validate(&self) -> Result<()> {
        if self.role == Role::Tool && self.tool_call_id.is_none() {
            return Err(SwitchboardError::invalid_message(
                "tool message without tool_call_id",
            ));
        }
        Ok(())
    }

    /// Text content, empty when absent
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }

    /// Requested tool calls, empty when none
    pub fn tool_calls(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }

    /// Whether this message requests at least one tool call
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls().is_empty()
    }

    /// Decode the content as a JSON object, if it is one
    pub fn json_object(&self) -> Option<serde_json::Map<String, Value>> {
        match serde_json::from_str(self.content.as_deref()?) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

/// A tool call made by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Opaque correlation token echoed back by the tool message
    pub id: String,
    /// Call type (always "function" for now)
    #[serde(rename = "type", default = "default_call_type")]
    pub call_type: String,
    /// Function details
    pub function: FunctionCall,
}

fn default_call_type() -> String {
    "function".to_string()
}

/// Function invocation within a tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the tool to invoke
    pub name: String,
    /// JSON-encoded argument object
    pub arguments: String,
}

impl ToolCall {
    /// Create a new function tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: &Value) -> Self {
        Self {
            id: id.into(),
            call_type: default_call_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.to_string(),
            },
        }
    }

    /// Name of the requested tool
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Decode the JSON arguments; an empty string means no arguments
    pub fn parse_arguments(&self) -> Result<Value> {
        let raw = self.function.arguments.trim();
        if raw.is_empty() {
            return Ok(json!({}));
        }
        Ok(serde_json::from_str(raw)?)
    }
}

/// Definition of a tool that can be called by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Type of tool (always "function" for now)
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function details
    pub function: FunctionDefinition,
}

/// Function definition within a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Name of the function
    pub name: String,
    /// Description of what the function does
    pub description: String,
    /// JSON Schema for the parameters
    pub parameters: Value,
    /// Whether the provider must reject arguments outside the schema
    #[serde(default)]
    pub strict: bool,
}

impl ToolDefinition {
    /// Create a new function tool definition
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        strict: bool,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
                strict,
            },
        }
    }
}

/// Result of executing a tool that completed without a fault
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Successful, JSON-serializable result
    Data(Value),
    /// Recoverable failure the model should see, e.g. a non-2xx upstream reply
    Failure(String),
}

impl ToolOutput {
    /// Create a failure output
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    /// Whether this is a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// JSON payload placed in the tool message
    pub fn into_content(self) -> Value {
        match self {
            Self::Data(value) => value,
            Self::Failure(message) => json!({ "error": message }),
        }
    }
}

/// Externally visible lifecycle state of one conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadStatus {
    /// Further user input is expected
    Active,
    /// Goal achieved, nothing left to do
    Complete,
    /// Unrecoverable failure for this turn
    Error,
}

impl std::fmt::Display for ThreadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadStatus::Active => write!(f, "active"),
            ThreadStatus::Complete => write!(f, "complete"),
            ThreadStatus::Error => write!(f, "error"),
        }
    }
}

/// Request envelope accepted by the orchestrator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl ChatRequest {
    /// Create a request carrying only messages
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }
}

/// Response envelope returned by the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub result: String,
    pub conversation_id: Option<String>,
    pub thread_id: Option<String>,
    pub session_id: Option<String>,
    pub thread_status: ThreadStatus,
    pub messages: Vec<Message>,
    pub error_details: Option<String>,
}
