//! Switchboard - triage-routed multi-agent orchestration
//!
//! Routes each conversation turn through a triage agent to one of several
//! specialised agents, runs the tools the model asks for, and reports whether
//! the conversation thread is still active, complete, or failed.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, the registration table and error handling
//! - **LLM**: Model client abstraction with OpenAI-compatible and scripted implementations
//! - **Tools**: Routing tools, externally-backed tools, built-in services, tool registry
//! - **Agent**: Agent engine, agent registry and the triage orchestrator
//! - **CLI**: Command-line interface and REPL
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use switchboard::{AgentRegistry, ChatRequest, Config, Message, OpenAiClient, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> switchboard::Result<()> {
//!     let config = Config::load(None)?;
//!     let registry = AgentRegistry::from_config(&config);
//!     let client = Arc::new(OpenAiClient::from_config(&config.model)?);
//!     let orchestrator = Orchestrator::new(&registry, client, config.orchestrator.clone())?;
//!
//!     let response = orchestrator
//!         .process_request(ChatRequest::new(vec![Message::user("100 USD in EUR?")]))
//!         .await;
//!     println!("{} [{}]", response.result, response.thread_status);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod llm;
pub mod tools;

// Re-export commonly used items
pub use agent::{Agent, AgentRegistry, Orchestrator};
pub use cli::Repl;
pub use core::{ChatRequest, ChatResponse, Config, Message, Result, SwitchboardError, ThreadStatus};
pub use llm::{ModelClient, OpenAiClient, ScriptedClient};
pub use tools::{ServiceManifest, Tool, ToolRegistry};
