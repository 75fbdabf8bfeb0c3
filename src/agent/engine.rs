//! Agent engine
//!
//! Runs one agent over a message sequence: call the model, execute every
//! tool it requests, feed the results back, and repeat until the model
//! answers without tools or the round-trip bound is hit.

use futures::future::join_all;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::agent::loop_state::AgentLoopState;
use crate::core::{Message, Result, SwitchboardError, ToolCall, ToolDefinition, ToolOutput};
use crate::llm::ModelClient;
use crate::tools::Tool;

/// Default bound on tool round-trips per run
pub const DEFAULT_MAX_ROUND_TRIPS: usize = 10;

/// Engine-level fault of an agent run
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeError {
    pub message: String,
    /// Server-side fault (as opposed to a client/request problem)
    pub server: bool,
}

impl ExchangeError {
    pub fn server(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            server: true,
        }
    }
}

/// Output of one agent run
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Caller messages plus everything the run appended, without the system prompt
    pub messages: Vec<Message>,
    pub error: Option<ExchangeError>,
}

impl Exchange {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// A system prompt plus a set of tools around the model
#[derive(Clone)]
pub struct Agent {
    name: String,
    instructions: Option<String>,
    tools: Vec<Arc<dyn Tool>>,
    specs: Vec<ToolDefinition>,
    max_round_trips: usize,
}

impl Agent {
    /// Create an unconfigured agent
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: None,
            tools: Vec::new(),
            specs: Vec::new(),
            max_round_trips: DEFAULT_MAX_ROUND_TRIPS,
        }
    }

    /// Set the system prompt
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Bind tools, deriving the specs sent to the model
    pub fn with_tools(mut self, tools: Vec<Arc<dyn Tool>>) -> Self {
        self.specs = tools.iter().map(|tool| tool.definition()).collect();
        self.tools = tools;
        self
    }

    /// Set the round-trip bound
    pub fn with_max_round_trips(mut self, max_round_trips: usize) -> Self {
        self.max_round_trips = max_round_trips;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions.as_deref()
    }

    pub fn specs(&self) -> &[ToolDefinition] {
        &self.specs
    }

    pub fn max_round_trips(&self) -> usize {
        self.max_round_trips
    }

    /// Names of the bound tools, in binding order
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    fn tool(&self, name: &str) -> Result<&Arc<dyn Tool>> {
        self.tools
            .iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| SwitchboardError::UnknownTool(name.to_string()))
    }

    /// Run the agent over `messages`
    ///
    /// Model failures are returned as `Err`. Tool failures become the content
    /// of the corresponding tool message. Exceeding the round-trip bound is
    /// reported through [`Exchange::error`].
    pub async fn process(&self, messages: &[Message], client: &dyn ModelClient) -> Result<Exchange> {
        let instructions = self
            .instructions
            .as_deref()
            .filter(|text| !text.is_empty())
            .ok_or_else(|| SwitchboardError::MissingInstructions(self.name.clone()))?;

        info!(agent = %self.name, messages = messages.len(), "Processing");

        let mut sequence = Vec::with_capacity(messages.len() + 2);
        sequence.push(Message::system(instructions));
        sequence.extend_from_slice(messages);

        let mut state = AgentLoopState::new(self.max_round_trips);

        loop {
            let reply = client.chat(&sequence, &self.specs).await?;

            if !reply.has_tool_calls() {
                sequence.push(reply);
                debug!(
                    agent = %self.name,
                    round_trips = state.round_trips,
                    tool_calls = state.tool_calls,
                    "Final answer"
                );
                return Ok(Self::exchange(sequence, None));
            }

            if !state.should_continue() {
                warn!(
                    agent = %self.name,
                    limit = self.max_round_trips,
                    "Round-trip limit exceeded"
                );
                let error = SwitchboardError::RoundTripLimit {
                    agent: self.name.clone(),
                    limit: self.max_round_trips,
                };
                return Ok(Self::exchange(
                    sequence,
                    Some(ExchangeError::server(error.to_string())),
                ));
            }

            let calls = reply.tool_calls().to_vec();
            sequence.push(reply);

            let results = join_all(calls.iter().map(|call| self.run_tool_call(call))).await;
            for (call, content) in calls.iter().zip(results) {
                sequence.push(Message::tool_result(call, &content));
            }

            state.record_round_trip(calls.len());
        }
    }

    fn exchange(mut sequence: Vec<Message>, error: Option<ExchangeError>) -> Exchange {
        sequence.remove(0);
        Exchange {
            messages: sequence,
            error,
        }
    }

    /// Execute one requested call, turning any failure into an error payload
    async fn run_tool_call(&self, call: &ToolCall) -> Value {
        info!(agent = %self.name, tool = call.name(), "Executing tool");

        let outcome: Result<ToolOutput> = async {
            let tool = self.tool(call.name())?;
            let args = call.parse_arguments()?;
            tool.execute(args).await
        }
        .await;

        match outcome {
            Ok(output) => output.into_content(),
            Err(e) => {
                warn!(agent = %self.name, tool = call.name(), error = %e, "Tool call failed");
                json!({ "error": e.to_string(), "type": e.kind() })
            }
        }
    }
}
