//! OpenAI-compatible chat completion client
//!
//! Async HTTP client for the `/chat/completions` endpoint with tool calling.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::core::config::ModelConfig;
use crate::core::{Message, Result, SwitchboardError, ToolDefinition};
use crate::llm::traits::ModelClient;

/// Chat completion API client
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: u32,
}

/// Completion request body
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [ToolDefinition],
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
    temperature: f32,
    max_tokens: u32,
}

fn no_tools(tools: &&[ToolDefinition]) -> bool {
    tools.is_empty()
}

/// Completion response (only the fields we read)
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

impl OpenAiClient {
    /// Create a new client from configuration
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn chat(&self, messages: &[Message], tools: &[ToolDefinition]) -> Result<Message> {
        let request = CompletionRequest {
            model: &self.model,
            messages,
            tools,
            tool_choice: (!tools.is_empty()).then_some("auto"),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "Sending chat completion"
        );

        let mut builder = self.client.post(self.endpoint()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() {
                SwitchboardError::model(format!(
                    "Cannot connect to model endpoint at {}",
                    self.base_url
                ))
            } else {
                SwitchboardError::from(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SwitchboardError::model(format!(
                "Chat completion error ({}): {}",
                status, error_text
            )));
        }

        let response_text = response.text().await?;
        let completion: CompletionResponse = serde_json::from_str(&response_text)
            .map_err(|e| SwitchboardError::model(format!("Failed to parse response: {}", e)))?;

        let message = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| SwitchboardError::model("Response contained no choices"))?;

        if message.has_tool_calls() {
            let names: Vec<&str> = message.tool_calls().iter().map(|c| c.name()).collect();
            debug!(?names, "Model requested tools");
        }

        Ok(message)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Role;
    use serde_json::{json, Value};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup_mock_server(status: u16, response_body: Value) -> (MockServer, OpenAiClient) {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test_api_key"))
            .respond_with(ResponseTemplate::new(status).set_body_json(response_body))
            .mount(&mock_server)
            .await;

        let config = ModelConfig {
            base_url: format!("{}/v1", mock_server.uri()),
            model: "gpt-4o-mini".to_string(),
            api_key: Some("test_api_key".to_string()),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_secs: 5,
        };

        let client = OpenAiClient::from_config(&config).unwrap();
        (mock_server, client)
    }

    async fn last_request_body(server: &MockServer) -> Value {
        let requests = server.received_requests().await.unwrap();
        serde_json::from_slice(&requests.last().unwrap().body).unwrap()
    }

    #[tokio::test]
    async fn test_chat_text_reply() {
        let response_body = json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hello!", "refusal": null},
                "finish_reason": "stop"
            }]
        });
        let (server, client) = setup_mock_server(200, response_body).await;

        let reply = client.chat(&[Message::user("Hi")], &[]).await.unwrap();
        assert_eq!(reply.role, Role::Assistant);
        assert_eq!(reply.text(), "Hello!");
        assert!(!reply.has_tool_calls());

        let body = last_request_body(&server).await;
        assert_eq!(body["model"], "gpt-4o-mini");
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[tokio::test]
    async fn test_chat_tool_request() {
        let response_body = json!({
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_123",
                        "type": "function",
                        "function": {
                            "name": "tool_currency",
                            "arguments": "{\"amount\":100,\"from_currency\":\"USD\",\"to_currency\":\"EUR\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });
        let (server, client) = setup_mock_server(200, response_body).await;

        let tools = vec![ToolDefinition::function(
            "tool_currency",
            "Convert",
            json!({"type": "object", "properties": {}}),
            true,
        )];
        let reply = client.chat(&[Message::user("100 USD in EUR?")], &tools).await.unwrap();

        let call = &reply.tool_calls()[0];
        assert_eq!(call.id, "call_123");
        assert_eq!(call.name(), "tool_currency");
        assert_eq!(call.parse_arguments().unwrap()["amount"], 100);

        let body = last_request_body(&server).await;
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["tools"][0]["function"]["name"], "tool_currency");
        assert_eq!(body["tools"][0]["function"]["strict"], true);
    }

    #[tokio::test]
    async fn test_chat_error_status() {
        let (_server, client) =
            setup_mock_server(500, json!({"error": {"message": "boom"}})).await;

        let err = client.chat(&[Message::user("Hi")], &[]).await.unwrap_err();
        assert!(matches!(err, SwitchboardError::Model(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_chat_no_choices() {
        let (_server, client) = setup_mock_server(200, json!({"choices": []})).await;

        let err = client.chat(&[Message::user("Hi")], &[]).await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
