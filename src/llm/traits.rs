//! Model client trait for abstracting chat completion backends
//!
//! The engine only needs "send messages + tool specs, receive a message that
//! may contain tool calls"; everything else is the backend's business.

use async_trait::async_trait;

use crate::core::{Message, Result, ToolDefinition};

/// Trait for chat completion backends
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the conversation and the available tools, get the assistant reply
    ///
    /// With an empty `tools` slice the model must answer in text.
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<Message>;

    /// Get the client name
    fn name(&self) -> &str;
}
