//! LLM module - chat completion backends
//!
//! Provides the model client abstraction with an OpenAI-compatible HTTP
//! implementation and a scripted in-process one.

pub mod mock;
pub mod openai;
pub mod traits;

pub use mock::ScriptedClient;
pub use openai::OpenAiClient;
pub use traits::ModelClient;
