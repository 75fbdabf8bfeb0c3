//! Routing tool
//!
//! Calling it has no side effect; the result tells the orchestrator which
//! agent should take over.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::core::{Result, ToolOutput};
use crate::tools::Tool;

pub struct RoutingTool {
    name: String,
    description: String,
    schema: Value,
}

impl RoutingTool {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        }
    }
}

#[async_trait]
impl Tool for RoutingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, _args: Value) -> Result<ToolOutput> {
        Ok(ToolOutput::Data(json!({
            "routing": self.name,
            "status": "success"
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_routing_result_names_itself() {
        let tool = RoutingTool::new("transfer_to_agent_weather", "Weather questions");
        let output = tool.execute(json!({})).await.unwrap();

        assert_eq!(
            output,
            ToolOutput::Data(json!({"routing": "transfer_to_agent_weather", "status": "success"}))
        );
    }

    #[test]
    fn test_definition_takes_no_parameters() {
        let def = RoutingTool::new("transfer_to_unsupported", "Anything else").definition();
        assert!(def.function.strict);
        assert_eq!(def.function.parameters["properties"], json!({}));
        assert_eq!(def.function.parameters["additionalProperties"], false);
    }
}
