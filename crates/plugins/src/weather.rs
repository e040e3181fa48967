//! Weather plugin — looks up current conditions for a city.
//!
//! Detection matches "weather in <city>" phrasing. Execution calls the
//! configured weather API with a bounded timeout; without an API key it
//! answers with fixed demo data instead. A failed lookup is absorbed into
//! `PluginResult { success: false }` so the orchestrator can fall back to
//! generation — it never aborts the request.

use async_trait::async_trait;
use parley_config::WeatherConfig;
use parley_core::{Plugin, PluginResult};
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// The weather collaborator failed; recovered locally by the plugin.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("weather lookup unavailable: {0}")]
    Unavailable(String),
}

pub struct WeatherPlugin {
    pattern: Regex,
    config: WeatherConfig,
    client: reqwest::Client,
}

impl WeatherPlugin {
    pub fn new(config: WeatherConfig) -> Self {
        // Construction-time failure here is a broken environment, not a
        // recoverable lookup error; a fallback client would have no timeout.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build HTTP client");
        Self {
            pattern: Regex::new(r"(?i)weather\s+in\s+([a-zA-Z\s]+)").expect("invalid weather regex"),
            config,
            client,
        }
    }

    /// Fetch live conditions from the configured API.
    async fn fetch_weather(&self, city: &str, api_key: &str) -> Result<String, LookupError> {
        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        let report: WeatherReport = response
            .json()
            .await
            .map_err(|e| LookupError::Unavailable(e.to_string()))?;

        let description = report
            .weather
            .first()
            .map(|c| c.description.as_str())
            .unwrap_or("unknown conditions");

        Ok(format!(
            "Current weather in {city}: {}°C, {description}, humidity {}%, wind {} m/s",
            report.main.temp.round(),
            report.main.humidity,
            report.wind.speed,
        ))
    }
}

#[async_trait]
impl Plugin for WeatherPlugin {
    fn name(&self) -> &str {
        "weather"
    }

    fn matches(&self, text: &str) -> Option<String> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|city| !city.is_empty())
    }

    async fn execute(&self, argument: &str) -> PluginResult {
        let Some(api_key) = self.config.api_key.as_deref() else {
            // Demo mode: deterministic canned conditions.
            return PluginResult::ok(
                self.name(),
                argument,
                format!(
                    "Current weather in {argument}: 22°C, partly cloudy with light winds. \
                     (Demo data - set WEATHER_API_KEY for live conditions)"
                ),
            );
        };

        match self.fetch_weather(argument, api_key).await {
            Ok(report) => PluginResult::ok(self.name(), argument, report),
            Err(e) => {
                tracing::warn!(city = argument, error = %e, "weather lookup failed");
                PluginResult::failed(
                    self.name(),
                    argument,
                    format!("Unable to fetch weather data for {argument}"),
                )
            }
        }
    }
}

#[derive(Deserialize)]
struct WeatherReport {
    main: MainConditions,
    weather: Vec<ConditionSummary>,
    wind: Wind,
}

#[derive(Deserialize)]
struct MainConditions {
    temp: f64,
    humidity: u32,
}

#[derive(Deserialize)]
struct ConditionSummary {
    description: String,
}

#[derive(Deserialize)]
struct Wind {
    speed: f64,
}
