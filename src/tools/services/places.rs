//! Places of interest from the Foursquare Places API

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::core::{Result, ToolOutput};
use crate::tools::service::{Service, ServiceSettings};

pub const API_KEY_ENV: &str = "FOURSQUARE_API_KEY";
pub const FOURSQUARE_API_BASE: &str = "https://api.foursquare.com/v3";

const RESULTS_LIMIT: &str = "10";
const SEARCH_FIELDS: &str = "fsq_id,name,categories,rating,location,distance";

pub const PLACE_CATEGORIES: [&str; 7] = [
    "arts",
    "entertainment",
    "landmarks",
    "food",
    "nightlife",
    "outdoors",
    "shopping",
];

/// Foursquare category id for a category name
fn category_id(category: &str) -> Option<&'static str> {
    match category {
        "arts" => Some("10000"),
        "entertainment" => Some("10035"),
        "landmarks" => Some("16000"),
        "food" => Some("13000"),
        "nightlife" => Some("10032"),
        "outdoors" => Some("16000"),
        "shopping" => Some("17000"),
        _ => None,
    }
}

/// Typical visit cost in EUR for a category
fn typical_cost(category: &str) -> u32 {
    match category {
        "arts" => 15,
        "entertainment" => 25,
        "landmarks" => 10,
        "food" => 30,
        "nightlife" => 20,
        _ => 0,
    }
}

pub fn schema() -> Value {
    json!({
        "type": "object",
        "required": ["city", "categories"],
        "properties": {
            "city": {
                "type": "string",
                "description": "City name to find places in"
            },
            "categories": {
                "type": "array",
                "items": {
                    "type": "string",
                    "enum": PLACE_CATEGORIES
                },
                "description": "Categories of places to find. Must be one or more of: arts, entertainment, landmarks, food, nightlife, outdoors, shopping"
            }
        },
        "additionalProperties": false
    })
}

#[derive(Debug, Deserialize)]
struct PlacesRequest {
    city: String,
    categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    name: String,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    location: PlaceLocation,
    #[serde(default)]
    distance: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaceLocation {
    #[serde(default)]
    formatted_address: Option<String>,
}

pub struct PlacesService {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PlacesService {
    pub fn new(settings: &ServiceSettings) -> Result<Self> {
        Ok(Self {
            client: settings.http_client()?,
            base_url: settings.base_url_or(FOURSQUARE_API_BASE),
            api_key: settings.require_api_key()?,
        })
    }

    async fn search(&self, city: &str, category: &str, id: &str) -> Result<Vec<Value>> {
        let response = self
            .client
            .get(format!("{}/places/search", self.base_url))
            .query(&[
                ("query", ""),
                ("near", city),
                ("categories", id),
                ("sort", "RATING"),
                ("limit", RESULTS_LIMIT),
                ("fields", SEARCH_FIELDS),
            ])
            .header("Authorization", self.api_key.as_str())
            .header("Accept", "application/json")
            .send()
            .await?;

        // A failed category does not fail the whole search
        if !response.status().is_success() {
            warn!(category, status = response.status().as_u16(), "Error from Foursquare");
            return Ok(Vec::new());
        }

        let data: SearchResponse = response.json().await?;
        Ok(data
            .results
            .into_iter()
            .map(|place| {
                json!({
                    "name": place.name,
                    "category": category,
                    "rating": place.rating.map(Value::from).unwrap_or_else(|| json!("Not rated")),
                    "address": place
                        .location
                        .formatted_address
                        .unwrap_or_else(|| "Address not available".to_string()),
                    "distance": format!("{}m from city center", place.distance.unwrap_or(0)),
                    "cost_eur": typical_cost(category),
                })
            })
            .collect())
    }
}

#[async_trait]
impl Service for PlacesService {
    async fn execute(&self, request: Value) -> Result<ToolOutput> {
        let request: PlacesRequest = serde_json::from_value(request)?;
        info!(city = %request.city, "Places API request");

        let mut places = Vec::new();
        for category in &request.categories {
            let Some(id) = category_id(category) else {
                continue;
            };
            debug!(%category, "Searching places");
            places.extend(self.search(&request.city, category, id).await?);
        }

        info!(found = places.len(), "Places API search completed");
        Ok(ToolOutput::Data(json!({
            "city": request.city,
            "places": places,
        })))
    }
}
