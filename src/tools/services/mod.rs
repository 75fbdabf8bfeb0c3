//! Built-in REST services and the manifest that locates them
//!
//! A `tool_<words>` name maps to the type-name fragment `<Words>`
//! (`tool_weather_forecast` → `WeatherForecast`). The manifest holds, per
//! fragment, the service constructor and the argument schema.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::Result;
use crate::tools::service::{Service, ServiceSettings};

pub mod currency;
pub mod places;
pub mod weather_forecast;

pub use currency::CurrencyService;
pub use places::PlacesService;
pub use weather_forecast::WeatherForecastService;

/// Builds a service from its resolved settings
pub type ServiceConstructor =
    Arc<dyn Fn(&ServiceSettings) -> Result<Arc<dyn Service>> + Send + Sync>;

/// Constructor and schema registered for one fragment
#[derive(Clone)]
pub struct ServiceEntry {
    /// JSON Schema of the tool arguments
    pub schema: Value,
    /// Environment variable the API key is read from by default
    pub api_key_env: String,
    constructor: ServiceConstructor,
}

impl ServiceEntry {
    pub fn new<F>(schema: Value, constructor: F) -> Self
    where
        F: Fn(&ServiceSettings) -> Result<Arc<dyn Service>> + Send + Sync + 'static,
    {
        Self {
            schema,
            api_key_env: String::new(),
            constructor: Arc::new(constructor),
        }
    }

    /// Set the default API key variable
    pub fn api_key_env(mut self, name: impl Into<String>) -> Self {
        self.api_key_env = name.into();
        self
    }

    /// Construct the service
    pub fn construct(&self, settings: &ServiceSettings) -> Result<Arc<dyn Service>> {
        (self.constructor)(settings)
    }
}

/// Explicit fragment → (service, schema) table
#[derive(Clone, Default)]
pub struct ServiceManifest {
    entries: HashMap<String, ServiceEntry>,
}

impl ServiceManifest {
    /// Empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Manifest with the weather, currency and places services
    pub fn builtin() -> Self {
        let mut manifest = Self::new();
        manifest.register(
            "WeatherForecast",
            ServiceEntry::new(weather_forecast::schema(), |settings| {
                Ok(Arc::new(WeatherForecastService::new(settings)?) as Arc<dyn Service>)
            })
            .api_key_env(weather_forecast::API_KEY_ENV),
        );
        manifest.register(
            "Currency",
            ServiceEntry::new(currency::schema(), |settings| {
                Ok(Arc::new(CurrencyService::new(settings)?) as Arc<dyn Service>)
            })
            .api_key_env(currency::API_KEY_ENV),
        );
        manifest.register(
            "Places",
            ServiceEntry::new(places::schema(), |settings| {
                Ok(Arc::new(PlacesService::new(settings)?) as Arc<dyn Service>)
            })
            .api_key_env(places::API_KEY_ENV),
        );
        manifest
    }

    /// Register (or replace) the entry for a fragment
    pub fn register(&mut self, fragment: impl Into<String>, entry: ServiceEntry) {
        self.entries.insert(fragment.into(), entry);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with_service(mut self, fragment: impl Into<String>, entry: ServiceEntry) -> Self {
        self.register(fragment, entry);
        self
    }

    pub fn get(&self, fragment: &str) -> Option<&ServiceEntry> {
        self.entries.get(fragment)
    }

    pub fn contains(&self, fragment: &str) -> bool {
        self.entries.contains_key(fragment)
    }
}

/// `weather_forecast` → `WeatherForecast`
pub fn pascal_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Round to two decimal places
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
