//! Externally-backed tools
//!
//! A [`ServiceTool`] forwards its arguments to a [`Service`], the REST
//! integration found for it in the service manifest.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::core::config::ServiceConfig;
use crate::core::{Result, SwitchboardError, ToolOutput};
use crate::tools::Tool;

/// Default upstream request timeout in seconds
pub const DEFAULT_SERVICE_TIMEOUT_SECS: u64 = 30;

/// A REST integration behind an externally-backed tool
///
/// Non-2xx upstream replies are `Ok(ToolOutput::Failure)`; transport and
/// configuration faults are `Err`.
#[async_trait]
pub trait Service: Send + Sync {
    async fn execute(&self, request: Value) -> Result<ToolOutput>;
}

/// Resolved endpoint settings a service is constructed with
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    /// Override of the upstream base URL
    pub base_url: Option<String>,
    /// API key, if one was configured or found in the environment
    pub api_key: Option<String>,
    /// Environment variable the key was looked up in
    pub api_key_env: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            api_key_env: String::new(),
            timeout_secs: DEFAULT_SERVICE_TIMEOUT_SECS,
        }
    }
}

impl ServiceSettings {
    /// Combine a tool's `[services.<name>]` section with the environment
    ///
    /// An inline key wins over the environment; the variable name comes from
    /// the section or else `default_key_env`.
    pub fn resolve(config: Option<&ServiceConfig>, default_key_env: &str) -> Self {
        let config = config.cloned().unwrap_or_default();
        let api_key_env = config
            .api_key_env
            .unwrap_or_else(|| default_key_env.to_string());
        let api_key = config.api_key.or_else(|| {
            if api_key_env.is_empty() {
                None
            } else {
                env::var(&api_key_env).ok()
            }
        });

        Self {
            base_url: config.base_url,
            api_key,
            api_key_env,
            timeout_secs: config.timeout_secs.unwrap_or(DEFAULT_SERVICE_TIMEOUT_SECS),
        }
    }

    /// The API key, or a configuration error naming where it was expected
    pub fn require_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| SwitchboardError::config(format!("Missing {}", self.api_key_env)))
    }

    /// The configured base URL, or `default`
    pub fn base_url_or(&self, default: &str) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }

    /// HTTP client carrying the configured timeout
    pub fn http_client(&self) -> Result<Client> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?)
    }
}

/// Tool whose execution is delegated to a service
pub struct ServiceTool {
    name: String,
    description: String,
    schema: Value,
    service: Arc<dyn Service>,
}

impl ServiceTool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Value,
        service: Arc<dyn Service>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            service,
        }
    }
}

#[async_trait]
impl Tool for ServiceTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> &Value {
        &self.schema
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        info!(tool = %self.name, "Executing");

        match self.service.execute(args).await {
            Ok(ToolOutput::Failure(message)) => {
                warn!(tool = %self.name, %message, "Service reported a failure");
                Ok(ToolOutput::Failure(message))
            }
            Ok(output) => Ok(output),
            Err(e) => {
                error!(tool = %self.name, error = %e, "Service execution failed");
                Err(e)
            }
        }
    }
}
