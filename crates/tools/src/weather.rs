//! Temperature lookup capability — current temperature via open-meteo.
//!
//! Calls the open-meteo forecast API (no credential required) and renders
//! the result as a single sentence. Network and decode failures surface as
//! capability errors, which the dispatcher converts to error observations.

use async_trait::async_trait;
use reagent_core::capability::{ArgValue, Capability, ParamKind, ParamSpec};
use reagent_core::error::CapabilityError;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com";

pub struct TemperatureCapability {
    base_url: String,
    client: reqwest::Client,
}

impl TemperatureCapability {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create with a custom base URL (for testing).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for TemperatureCapability {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Capability for TemperatureCapability {
    fn name(&self) -> &str {
        "get_temperature"
    }

    fn signature(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::new("latitude", ParamKind::Float),
            ParamSpec::new("longitude", ParamKind::Float),
        ]
    }

    fn description(&self) -> &str {
        "Gets the current temperature for a location. Latitude is positive for N and negative for S; longitude is positive for E and negative for W. Example: get_temperature(13.1, -97.4)"
    }

    async fn invoke(&self, args: &[ArgValue]) -> Result<String, CapabilityError> {
        if args.len() != 2 {
            return Err(CapabilityError::InvalidArguments {
                name: self.name().into(),
                reason: format!("expected latitude and longitude, got {} arguments", args.len()),
            });
        }
        let latitude = args[0]
            .as_f64()
            .ok_or_else(|| CapabilityError::InvalidArguments {
                name: self.name().into(),
                reason: format!("latitude is not a number: {}", args[0]),
            })?;
        let longitude = args[1]
            .as_f64()
            .ok_or_else(|| CapabilityError::InvalidArguments {
                name: self.name().into(),
                reason: format!("longitude is not a number: {}", args[1]),
            })?;

        debug!(latitude, longitude, "Fetching current temperature");

        let url = format!("{}/v1/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", "temperature_2m".to_string()),
            ])
            .send()
            .await
            .map_err(|e| CapabilityError::InvocationFailed {
                name: self.name().into(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(CapabilityError::InvocationFailed {
                name: self.name().into(),
                reason: format!("weather API returned status {}", response.status()),
            });
        }

        let forecast: ForecastResponse =
            response
                .json()
                .await
                .map_err(|e| CapabilityError::InvocationFailed {
                    name: self.name().into(),
                    reason: format!("failed to decode weather response: {e}"),
                })?;

        Ok(render_temperature(
            latitude,
            longitude,
            forecast.current.temperature_2m,
        ))
    }
}

fn render_temperature(latitude: f64, longitude: f64, temperature: f64) -> String {
    format!("The temperature at {latitude}, {longitude} is {temperature}°C")
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature_2m: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_forecast_response() {
        let data = r#"{
            "latitude": 51.5,
            "longitude": -0.12,
            "current": {"time": "2025-06-01T12:00", "temperature_2m": 18.3}
        }"#;
        let parsed: ForecastResponse = serde_json::from_str(data).unwrap();
        assert!((parsed.current.temperature_2m - 18.3).abs() < f64::EPSILON);
    }

    #[test]
    fn rendered_sentence_contains_coordinates_and_unit() {
        let out = render_temperature(13.1, -97.4, 24.5);
        assert_eq!(out, "The temperature at 13.1, -97.4 is 24.5°C");
    }

    #[tokio::test]
    async fn wrong_arity_rejected() {
        let cap = TemperatureCapability::new();
        let err = cap.invoke(&[ArgValue::Float(1.0)]).await.unwrap_err();
        assert!(matches!(err, CapabilityError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn string_latitude_rejected() {
        let cap = TemperatureCapability::new();
        let err = cap
            .invoke(&[ArgValue::Str("London".into()), ArgValue::Float(0.0)])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn capability_doc_renders_signature() {
        let cap = TemperatureCapability::new();
        let doc = cap.render_doc();
        assert!(doc.starts_with("get_temperature(latitude: float, longitude: float)"));
    }
}
