//! Agent orchestrator
//!
//! Runs every request through the triage agent, dispatches to the agent the
//! triage picked, and derives the thread status of the turn.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::agent::engine::{Agent, Exchange, ExchangeError};
use crate::agent::registry::AgentRegistry;
use crate::core::config::OrchestratorConfig;
use crate::core::{
    ChatRequest, ChatResponse, Message, Result, Role, SwitchboardError, ThreadStatus,
};
use crate::llm::ModelClient;

/// Reply when the triage decides nobody can help
pub const UNSUPPORTED_REPLY: &str = "I apologize, but I cannot help with that request.";
/// Result text of a failed turn with no assistant text to show
pub const GENERIC_ERROR_REPLY: &str = "An error occurred";

/// Triage-routed front of the agent set
pub struct Orchestrator {
    agents: HashMap<String, Agent>,
    client: Arc<dyn ModelClient>,
    settings: OrchestratorConfig,
}

impl Orchestrator {
    /// Resolve every registered agent up front
    ///
    /// Configuration faults (unknown tools, missing services, missing API
    /// keys) surface here rather than on the first request.
    pub fn new(
        registry: &AgentRegistry,
        client: Arc<dyn ModelClient>,
        settings: OrchestratorConfig,
    ) -> Result<Self> {
        let agents = registry
            .names()
            .into_iter()
            .map(|name| registry.resolve(&name).map(|agent| (name, agent)))
            .collect::<Result<HashMap<_, _>>>()?;

        if !agents.contains_key(&settings.triage_agent) {
            return Err(SwitchboardError::config(format!(
                "Triage agent {} must be defined in configuration",
                settings.triage_agent
            )));
        }

        let mut names: Vec<&String> = agents.keys().collect();
        names.sort();
        info!(agents = ?names, client = client.name(), "Orchestrator ready");

        Ok(Self {
            agents,
            client,
            settings,
        })
    }

    /// Names of the resolved agents, sorted
    pub fn agent_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.agents.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.get(name)
    }

    pub fn settings(&self) -> &OrchestratorConfig {
        &self.settings
    }

    /// Process one conversation turn
    ///
    /// Always returns a well-formed envelope; unexpected failures become an
    /// `error` status with the caller's messages echoed back.
    pub async fn process_request(&self, request: ChatRequest) -> ChatResponse {
        info!(
            conversation_id = ?request.conversation_id,
            thread_id = ?request.thread_id,
            user_id = ?request.user_id,
            "Processing request"
        );

        match self.run(&request).await {
            Ok(response) => {
                info!(
                    status = %response.thread_status,
                    result = %preview(&response.result),
                    "Request processed"
                );
                response
            }
            Err(e) => {
                error!(error = %e, "Error processing request");
                ChatResponse {
                    result: "error".to_string(),
                    conversation_id: request.conversation_id,
                    thread_id: request.thread_id,
                    session_id: request.session_id,
                    thread_status: ThreadStatus::Error,
                    messages: request.messages,
                    error_details: Some(e.to_string()),
                }
            }
        }
    }

    async fn run(&self, request: &ChatRequest) -> Result<ChatResponse> {
        for message in &request.messages {
            message.validate()?;
        }

        let triage = self
            .agents
            .get(&self.settings.triage_agent)
            .ok_or_else(|| SwitchboardError::config("Triage agent is not resolved"))?;
        let mut exchange = triage
            .process(&request.messages, self.client.as_ref())
            .await?;

        // A failed triage run is reported as is, never routed
        let routing = match &exchange.error {
            Some(_) => None,
            None => find_routing(&exchange.messages),
        };

        if let Some(routing) = routing {
            if routing == self.settings.unsupported_route {
                info!("Request is unsupported");
                return Ok(self.respond(
                    request,
                    UNSUPPORTED_REPLY.to_string(),
                    ThreadStatus::Complete,
                    exchange.messages,
                    None,
                ));
            }

            let target = routing.replace(&self.settings.route_prefix, "");
            match self.agents.get(&target) {
                Some(agent) => {
                    info!(from = %triage.name(), to = %target, "Routing");
                    exchange = agent
                        .process(&request.messages, self.client.as_ref())
                        .await?;
                }
                None => {
                    error!(target = %target, "Unknown routing target");
                    exchange.error = Some(ExchangeError::server(format!(
                        "Unknown routing target: {}",
                        target
                    )));
                }
            }
        }

        let Exchange { messages, error } = exchange;
        let last_text = last_assistant_text(&messages);
        let thread_status = derive_thread_status(&messages, error.as_ref());

        let result = match &error {
            Some(_) => last_text
                .filter(|text| !text.is_empty())
                .unwrap_or(GENERIC_ERROR_REPLY)
                .to_string(),
            None => last_text.unwrap_or_default().to_string(),
        };
        let error_details = error.map(|e| e.message);

        Ok(self.respond(request, result, thread_status, messages, error_details))
    }

    fn respond(
        &self,
        request: &ChatRequest,
        result: String,
        thread_status: ThreadStatus,
        messages: Vec<Message>,
        error_details: Option<String>,
    ) -> ChatResponse {
        ChatResponse {
            result,
            conversation_id: request.conversation_id.clone(),
            thread_id: request.thread_id.clone(),
            session_id: request.session_id.clone(),
            thread_status,
            messages,
            error_details,
        }
    }
}

/// Most recent routing decision among the tool messages
///
/// Tool messages whose content is not a JSON object are skipped.
pub fn find_routing(messages: &[Message]) -> Option<String> {
    messages
        .iter()
        .rev()
        .filter(|message| message.role == Role::Tool)
        .find_map(|message| match message.json_object() {
            Some(object) => object
                .get("routing")
                .and_then(|routing| routing.as_str())
                .filter(|routing| !routing.is_empty())
                .map(str::to_string),
            None => {
                warn!(content = %message.text(), "Invalid tool response");
                None
            }
        })
}

/// Thread status of a finished turn
///
/// A fault is `error` when server-side and `active` otherwise. Without a
/// fault the turn is `complete` only if tools were requested and at least
/// one of them succeeded.
pub fn derive_thread_status(messages: &[Message], error: Option<&ExchangeError>) -> ThreadStatus {
    if let Some(error) = error {
        return if error.server {
            ThreadStatus::Error
        } else {
            ThreadStatus::Active
        };
    }

    if last_assistant_text(messages).is_none() {
        return ThreadStatus::Active;
    }

    let requested_tools = messages.iter().any(Message::has_tool_calls);
    if !requested_tools {
        return ThreadStatus::Active;
    }

    let tool_succeeded = messages
        .iter()
        .filter(|message| message.role == Role::Tool)
        .any(|message| {
            message
                .json_object()
                .is_some_and(|object| object.get("error").map_or(true, |e| is_falsy(e)))
        });

    if tool_succeeded {
        ThreadStatus::Complete
    } else {
        ThreadStatus::Active
    }
}

/// `null`, `false`, `""`, `0`, `[]` and `{}` do not count as an error
fn is_falsy(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn last_assistant_text(messages: &[Message]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|message| message.role == Role::Assistant)
        .map(Message::text)
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 100;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
