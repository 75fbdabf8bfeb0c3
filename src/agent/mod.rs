//! Agent module - agent engine, registry and orchestration
//!
//! Contains the per-agent tool-calling loop, the registry that builds agents
//! from configuration, and the triage orchestrator in front of them.

pub mod engine;
pub mod loop_state;
pub mod orchestrator;
pub mod registry;

pub use engine::{Agent, Exchange, ExchangeError};
pub use loop_state::AgentLoopState;
pub use orchestrator::{derive_thread_status, find_routing, Orchestrator};
pub use registry::AgentRegistry;
