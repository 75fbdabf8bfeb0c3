//! Scripted model client
//!
//! Replays a pre-configured sequence of replies and records every request,
//! so tests and offline runs can drive the engine without a network.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::{Message, Result, ToolDefinition};
use crate::llm::traits::ModelClient;

/// One request the client received
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub tools: Vec<String>,
}

/// A model client that returns pre-configured replies in order
#[derive(Clone, Default)]
pub struct ScriptedClient {
    replies: Arc<Mutex<VecDeque<Result<Message>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedClient {
    /// Create a client replaying `replies`
    pub fn new(replies: Vec<Message>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().map(Ok).collect())),
            calls: Arc::default(),
        }
    }

    /// Queue another reply
    pub fn push(&self, reply: Message) {
        lock(&self.replies).push_back(Ok(reply));
    }

    /// Queue a failure
    pub fn push_error(&self, error: crate::core::SwitchboardError) {
        lock(&self.replies).push_back(Err(error));
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Replies not consumed yet
    pub fn remaining(&self) -> usize {
        lock(&self.replies).len()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<Message> {
        lock(&self.calls).push(RecordedCall {
            messages: messages.to_vec(),
            tools: tools.iter().map(|t| t.function.name.clone()).collect(),
        });

        // An exhausted script answers with an empty assistant message
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Ok(Message::assistant("")))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SwitchboardError;

    #[tokio::test]
    async fn test_replays_in_order() {
        let client = ScriptedClient::new(vec![Message::assistant("one"), Message::assistant("two")]);

        let first = client.chat(&[Message::user("a")], &[]).await.unwrap();
        let second = client.chat(&[Message::user("b")], &[]).await.unwrap();
        let exhausted = client.chat(&[Message::user("c")], &[]).await.unwrap();

        assert_eq!(first.text(), "one");
        assert_eq!(second.text(), "two");
        assert_eq!(exhausted.text(), "");
        assert_eq!(client.call_count(), 3);
        assert_eq!(client.calls()[1].messages[0].text(), "b");
    }

    #[tokio::test]
    async fn test_scripted_error() {
        let client = ScriptedClient::default();
        client.push_error(SwitchboardError::model("down"));

        assert!(client.chat(&[], &[]).await.is_err());
        assert_eq!(client.remaining(), 0);
    }
}
