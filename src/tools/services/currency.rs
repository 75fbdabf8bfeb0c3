//! Currency conversion through ExchangeRate-API

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::core::{Result, ToolOutput};
use crate::tools::service::{Service, ServiceSettings};
use crate::tools::services::round2;

pub const API_KEY_ENV: &str = "EXCHANGERATE_API_KEY";
pub const EXCHANGERATE_API_BASE: &str = "https://v6.exchangerate-api.com/v6";

pub const SUPPORTED_CURRENCIES: [&str; 9] =
    ["USD", "EUR", "GBP", "JPY", "AUD", "CAD", "CHF", "CNY", "INR"];

pub fn schema() -> Value {
    json!({
        "type": "object",
        "required": ["amount", "from_currency", "to_currency"],
        "properties": {
            "amount": {
                "type": "number",
                "description": "Amount to convert"
            },
            "from_currency": {
                "type": "string",
                "enum": SUPPORTED_CURRENCIES,
                "description": "Source currency code (e.g., USD, EUR, GBP)"
            },
            "to_currency": {
                "type": "string",
                "enum": SUPPORTED_CURRENCIES,
                "description": "Target currency code (e.g., USD, EUR, GBP)"
            }
        },
        "additionalProperties": false
    })
}

#[derive(Debug, Deserialize)]
struct ConversionRequest {
    amount: f64,
    from_currency: String,
    to_currency: String,
}

#[derive(Debug, Deserialize)]
struct PairResponse {
    conversion_rate: f64,
}

pub struct CurrencyService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CurrencyService {
    pub fn new(settings: &ServiceSettings) -> Result<Self> {
        Ok(Self {
            client: settings.http_client()?,
            base_url: settings.base_url_or(EXCHANGERATE_API_BASE),
            api_key: settings.require_api_key()?,
        })
    }
}

#[async_trait]
impl Service for CurrencyService {
    async fn execute(&self, request: Value) -> Result<ToolOutput> {
        let request: ConversionRequest = serde_json::from_value(request)?;
        info!(
            amount = request.amount,
            from = %request.from_currency,
            to = %request.to_currency,
            "Currency API conversion"
        );

        let url = format!(
            "{}/{}/pair/{}/{}",
            self.base_url, self.api_key, request.from_currency, request.to_currency
        );
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            error!(status, "Currency API error");
            return Ok(ToolOutput::failure(format!("Currency API error: {}", status)));
        }

        let pair: PairResponse = response.json().await?;
        info!(rate = pair.conversion_rate, "Currency API conversion completed");

        Ok(ToolOutput::Data(json!({
            "from_amount": request.amount,
            "from_currency": request.from_currency,
            "to_amount": round2(request.amount * pair.conversion_rate),
            "to_currency": request.to_currency,
            "rate": pair.conversion_rate,
        })))
    }
}
