//! Daily weather forecast from WeatherAPI.com

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};

use crate::core::{Result, ToolOutput};
use crate::tools::service::{Service, ServiceSettings};

pub const API_KEY_ENV: &str = "WEATHERAPI_KEY";
pub const WEATHER_API_BASE: &str = "http://api.weatherapi.com/v1/forecast.json";

/// Days requested from the API, its maximum
const FORECAST_DAYS: &str = "14";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn schema() -> Value {
    json!({
        "type": "object",
        "required": ["city", "start_date", "end_date"],
        "properties": {
            "city": {
                "type": "string",
                "description": "City name to get weather forecast for"
            },
            "start_date": {
                "type": "string",
                "description": "Start date in YYYY-MM-DD format (must be within next 14 days)"
            },
            "end_date": {
                "type": "string",
                "description": "End date in YYYY-MM-DD format (must be within 14 days from start_date)"
            }
        },
        "additionalProperties": false
    })
}

#[derive(Debug, Deserialize)]
struct ForecastRequest {
    city: String,
    start_date: String,
    end_date: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    location: Location,
    forecast: Forecast,
}

#[derive(Debug, Deserialize)]
struct Location {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    date: String,
    day: Day,
}

#[derive(Debug, Deserialize)]
struct Day {
    maxtemp_c: f64,
    mintemp_c: f64,
    daily_chance_of_rain: Value,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

pub struct WeatherForecastService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherForecastService {
    pub fn new(settings: &ServiceSettings) -> Result<Self> {
        Ok(Self {
            client: settings.http_client()?,
            base_url: settings.base_url_or(WEATHER_API_BASE),
            api_key: settings.require_api_key()?,
        })
    }
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| format!("Invalid date '{}': {}", raw, e))
}

#[async_trait]
impl Service for WeatherForecastService {
    async fn execute(&self, request: Value) -> Result<ToolOutput> {
        let request: ForecastRequest = serde_json::from_value(request)?;
        info!(city = %request.city, "Weather API request");

        let (start, end) = match (parse_date(&request.start_date), parse_date(&request.end_date)) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(message), _) | (_, Err(message)) => return Ok(ToolOutput::Failure(message)),
        };

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", request.city.as_str()),
                ("key", self.api_key.as_str()),
                ("days", FORECAST_DAYS),
                ("aqi", "no"),
            ])
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            error!(status, "Weather API error");
            return Ok(ToolOutput::failure(format!("Weather API error: {}", status)));
        }

        let data: ForecastResponse = response.json().await?;

        let mut forecasts = Map::new();
        for day in data.forecast.forecastday {
            let Ok(date) = NaiveDate::parse_from_str(&day.date, DATE_FORMAT) else {
                debug!(date = %day.date, "Skipping unparseable forecast date");
                continue;
            };
            if date < start || date > end {
                continue;
            }
            forecasts.insert(
                day.date,
                json!({
                    "condition": day.day.condition.text,
                    "max_temp": day.day.maxtemp_c.round() as i64,
                    "min_temp": day.day.mintemp_c.round() as i64,
                    "rain_chance": day.day.daily_chance_of_rain,
                }),
            );
        }

        info!(days = forecasts.len(), "Weather API forecast retrieved");
        Ok(ToolOutput::Data(json!({
            "city": data.location.name,
            "country": data.location.country,
            "forecasts": forecasts,
        })))
    }
}
