//! End-to-end turns through the orchestrator
//!
//! Uses the scripted model client and an in-process weather service, so no
//! network is needed.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use switchboard::core::config::{AgentConfig, ToolConfig};
use switchboard::core::{Role, ToolCall, ToolOutput};
use switchboard::tools::{Service, ServiceEntry};
use switchboard::{
    AgentRegistry, ChatRequest, Config, Message, Orchestrator, ScriptedClient, ServiceManifest,
    SwitchboardError, ThreadStatus,
};

/// Weather service returning a fixed output
struct FakeWeather {
    output: ToolOutput,
}

#[async_trait]
impl Service for FakeWeather {
    async fn execute(&self, _request: Value) -> switchboard::Result<ToolOutput> {
        Ok(self.output.clone())
    }
}

fn config() -> Config {
    let mut config = Config::default();
    config.tools.clear();
    config.agents.clear();

    for (name, description) in [
        ("transfer_to_weather", "Weather questions"),
        ("transfer_to_unsupported", "Anything else"),
        ("transfer_to_ghost", "Routes nowhere"),
        ("tool_weather_forecast", "Forecast for a city"),
    ] {
        config
            .tools
            .insert(name.to_string(), ToolConfig::new(description));
    }

    config.agents.insert(
        "agent_triage".to_string(),
        AgentConfig::new(
            "Route the request.",
            &[
                "transfer_to_weather",
                "transfer_to_unsupported",
                "transfer_to_ghost",
            ],
        ),
    );
    config.agents.insert(
        "weather".to_string(),
        AgentConfig::new("Answer weather questions.", &["tool_weather_forecast"]),
    );
    config
}

fn setup_with(config: &Config, weather: ToolOutput) -> (Orchestrator, ScriptedClient) {
    let manifest = ServiceManifest::new().with_service(
        "WeatherForecast",
        ServiceEntry::new(json!({"type": "object", "properties": {}}), move |_| {
            Ok(Arc::new(FakeWeather {
                output: weather.clone(),
            }) as Arc<dyn Service>)
        }),
    );
    let registry = AgentRegistry::from_config_with_manifest(config, manifest);
    let client = ScriptedClient::default();
    let orchestrator = Orchestrator::new(
        &registry,
        Arc::new(client.clone()),
        config.orchestrator.clone(),
    )
    .unwrap();
    (orchestrator, client)
}

fn setup(weather: ToolOutput) -> (Orchestrator, ScriptedClient) {
    setup_with(&config(), weather)
}

fn sunny() -> ToolOutput {
    ToolOutput::Data(json!({
        "city": "Paris",
        "country": "France",
        "forecasts": {"2025-06-01": {"condition": "Sunny", "max_temp": 25, "min_temp": 14, "rain_chance": 0}}
    }))
}

fn tool_request(id: &str, name: &str, args: Value) -> Message {
    Message::assistant_with_tool_calls(vec![ToolCall::new(id, name, &args)])
}

fn request(text: &str) -> ChatRequest {
    ChatRequest {
        messages: vec![Message::user(text)],
        conversation_id: Some("conv-1".to_string()),
        thread_id: Some("thread-1".to_string()),
        session_id: Some("session-1".to_string()),
        user_id: Some("user-1".to_string()),
    }
}

/// Script the triage agent routing to `route`
fn script_routing(client: &ScriptedClient, route: &str) {
    client.push(tool_request("call_route", route, json!({})));
    client.push(Message::assistant("Let me hand you over."));
}

#[tokio::test]
async fn test_plain_answer_stays_active() {
    let (orchestrator, client) = setup(sunny());
    client.push(Message::assistant("Hello! How can I help?"));

    let response = orchestrator.process_request(request("Hi")).await;

    assert_eq!(response.thread_status, ThreadStatus::Active);
    assert_eq!(response.result, "Hello! How can I help?");
    assert_eq!(response.error_details, None);
    assert_eq!(response.messages.len(), 2);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_routed_agent_with_successful_tool_completes() {
    let (orchestrator, client) = setup(sunny());
    script_routing(&client, "transfer_to_weather");
    client.push(tool_request(
        "call_forecast",
        "tool_weather_forecast",
        json!({"city": "Paris", "start_date": "2025-06-01", "end_date": "2025-06-01"}),
    ));
    client.push(Message::assistant("Sunny in Paris, 25°C."));

    let response = orchestrator
        .process_request(request("Weather in Paris on June 1st?"))
        .await;

    assert_eq!(response.thread_status, ThreadStatus::Complete);
    assert_eq!(response.result, "Sunny in Paris, 25°C.");
    assert_eq!(response.error_details, None);

    // The routed agent starts again from the caller's messages
    let calls = client.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[2].messages.len(), 2);
    assert_eq!(calls[2].messages[0].text(), "Answer weather questions.");
    assert_eq!(calls[2].tools, vec!["tool_weather_forecast"]);

    let roles: Vec<Role> = response.messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::Tool, Role::Assistant]
    );
    let tool_content = response.messages[2].json_object().unwrap();
    assert_eq!(tool_content["city"], "Paris");
}

#[tokio::test]
async fn test_unsupported_request_completes_with_apology() {
    let (orchestrator, client) = setup(sunny());
    script_routing(&client, "transfer_to_unsupported");

    let response = orchestrator
        .process_request(request("Book me a flight"))
        .await;

    assert_eq!(response.thread_status, ThreadStatus::Complete);
    assert_eq!(
        response.result,
        "I apologize, but I cannot help with that request."
    );
    assert_eq!(response.error_details, None);
    // Only the triage agent ran
    assert_eq!(client.call_count(), 2);
    assert_eq!(response.messages.len(), 4);
}

#[tokio::test]
async fn test_upstream_failure_stays_active() {
    let (orchestrator, client) = setup(ToolOutput::failure("Weather API error: 503"));
    script_routing(&client, "transfer_to_weather");
    client.push(tool_request(
        "call_forecast",
        "tool_weather_forecast",
        json!({"city": "Paris", "start_date": "2025-06-01", "end_date": "2025-06-02"}),
    ));
    client.push(Message::assistant(
        "Sorry, the weather service is unavailable right now.",
    ));

    let response = orchestrator.process_request(request("Weather?")).await;

    assert_eq!(response.thread_status, ThreadStatus::Active);
    assert_eq!(response.error_details, None);
    let tool_content = response.messages[2].json_object().unwrap();
    assert_eq!(tool_content["error"], "Weather API error: 503");
}

#[tokio::test]
async fn test_unknown_routing_target_is_server_error() {
    let (orchestrator, client) = setup(sunny());
    script_routing(&client, "transfer_to_ghost");

    let response = orchestrator.process_request(request("Haunt me")).await;

    assert_eq!(response.thread_status, ThreadStatus::Error);
    assert_eq!(
        response.error_details.as_deref(),
        Some("Unknown routing target: ghost")
    );
    assert_eq!(response.result, "Let me hand you over.");
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_model_fault_echoes_original_messages() {
    let (orchestrator, client) = setup(sunny());
    script_routing(&client, "transfer_to_weather");
    client.push_error(SwitchboardError::model("connection reset"));

    let original = request("Weather in Paris?");
    let response = orchestrator.process_request(original.clone()).await;

    assert_eq!(response.thread_status, ThreadStatus::Error);
    assert_eq!(response.result, "error");
    assert_eq!(response.messages, original.messages);
    assert!(response
        .error_details
        .as_deref()
        .unwrap()
        .contains("connection reset"));
}

#[tokio::test]
async fn test_identifiers_pass_through() {
    let (orchestrator, client) = setup(sunny());
    client.push(Message::assistant("Hello!"));

    let response = orchestrator.process_request(request("Hi")).await;

    assert_eq!(response.conversation_id.as_deref(), Some("conv-1"));
    assert_eq!(response.thread_id.as_deref(), Some("thread-1"));
    assert_eq!(response.session_id.as_deref(), Some("session-1"));
}

#[tokio::test]
async fn test_round_trip_limit_is_server_error() {
    let mut config = config();
    config.orchestrator.max_round_trips = 1;
    let (orchestrator, client) = setup_with(&config, sunny());

    script_routing(&client, "transfer_to_weather");
    let forecast = || {
        tool_request(
            "call_forecast",
            "tool_weather_forecast",
            json!({"city": "Paris", "start_date": "2025-06-01", "end_date": "2025-06-01"}),
        )
    };
    client.push(forecast());
    client.push(forecast());

    let response = orchestrator.process_request(request("Weather?")).await;

    assert_eq!(response.thread_status, ThreadStatus::Error);
    assert!(response
        .error_details
        .as_deref()
        .unwrap()
        .contains("round-trips"));
    assert_eq!(response.result, "An error occurred");
}

#[tokio::test]
async fn test_triage_round_trip_limit_is_not_routed() {
    let mut config = config();
    config.orchestrator.max_round_trips = 1;

    for route in ["transfer_to_weather", "transfer_to_unsupported"] {
        let (orchestrator, client) = setup_with(&config, sunny());
        client.push(tool_request("call_1", route, json!({})));
        client.push(tool_request("call_2", route, json!({})));
        client.push(Message::assistant("Which dates?"));

        let response = orchestrator.process_request(request("Weather?")).await;

        assert_eq!(response.thread_status, ThreadStatus::Error, "route {}", route);
        let details = response.error_details.unwrap();
        assert!(details.contains("agent_triage"), "{}", details);
        assert!(details.contains("round-trips"), "{}", details);
        assert_eq!(response.result, "An error occurred");
        // The routed agent never ran
        assert_eq!(client.call_count(), 2);
        assert_eq!(client.remaining(), 1);
    }
}

#[tokio::test]
async fn test_invalid_message_is_rejected_at_the_boundary() {
    let (orchestrator, client) = setup(sunny());
    let mut bad = Message::user("orphan tool result");
    bad.role = Role::Tool;

    let response = orchestrator
        .process_request(ChatRequest::new(vec![bad.clone()]))
        .await;

    assert_eq!(response.thread_status, ThreadStatus::Error);
    assert_eq!(response.messages, vec![bad]);
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn test_routed_agent_without_instructions_is_error() {
    let mut config = config();
    config
        .agents
        .insert("weather".to_string(), AgentConfig::default());
    let (orchestrator, client) = setup_with(&config, sunny());
    script_routing(&client, "transfer_to_weather");

    let response = orchestrator.process_request(request("Weather?")).await;

    assert_eq!(response.thread_status, ThreadStatus::Error);
    assert!(response
        .error_details
        .unwrap()
        .contains("missing instructions"));
    // The triage ran; the routed agent never reached the model
    assert_eq!(client.call_count(), 2);
}

#[test]
fn test_missing_triage_agent_fails_at_startup() {
    let mut config = config();
    config.agents.remove("agent_triage");

    let registry = AgentRegistry::from_config_with_manifest(&config, ServiceManifest::new());
    let result = Orchestrator::new(
        &registry,
        Arc::new(ScriptedClient::default()),
        config.orchestrator.clone(),
    );
    assert!(matches!(result, Err(SwitchboardError::MissingService { .. })));

    config.agents.remove("weather");
    let registry = AgentRegistry::from_config_with_manifest(&config, ServiceManifest::new());
    let result = Orchestrator::new(
        &registry,
        Arc::new(ScriptedClient::default()),
        config.orchestrator.clone(),
    );
    assert!(matches!(result, Err(SwitchboardError::Config(_))));
}
