//! Weather Lookup Tool
//!
//! Reports current conditions for a city through a `WeatherClient`.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use agent_core::{
    tool::ParameterSchema,
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::error::AssistantError;
use crate::weather::{WeatherClient, WeatherReport};

pub const TOOL_NAME: &str = "get_weather";

#[derive(Deserialize)]
struct WeatherInput {
    city: String,
}

/// Tool for looking up the current weather
pub struct WeatherLookupTool {
    client: Arc<dyn WeatherClient>,
}

impl WeatherLookupTool {
    pub fn new(client: Arc<dyn WeatherClient>) -> Self {
        Self { client }
    }

    /// Look up `city` and render the outcome as the text the model sees.
    pub async fn lookup(&self, city: &str) -> Result<String, String> {
        let city = city.trim();
        if city.is_empty() {
            return Err("Error: a city name is required.".into());
        }

        tracing::debug!(city, client = self.client.name(), "Weather lookup");

        match self.client.current(city).await {
            Ok(report) => Ok(render(&report)),
            Err(e) => {
                tracing::warn!(city, error = %e, "Weather lookup failed");
                Err(match e {
                    AssistantError::MissingCredential(_) => {
                        "Error: the weather service API key is not configured.".into()
                    }
                    AssistantError::CityNotFound(_) => format!("Error: city '{city}' was not found."),
                    other => format!("Error: failed to fetch weather for '{city}': {other}"),
                })
            }
        }
    }
}

fn render(report: &WeatherReport) -> String {
    format!(
        "Weather in {}: {}, temperature {:.1}°C.",
        report.city, report.description, report.temperature_c
    )
}

#[async_trait]
impl Tool for WeatherLookupTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: TOOL_NAME.into(),
            description: "Use this tool when the user asks about the current weather or \
                temperature in a specific city."
                .into(),
            parameters: vec![ParameterSchema::required_string(
                "city",
                "The city to look up, e.g. 'Beijing' or 'Paris'",
            )],
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let outcome = match call.parse_args::<WeatherInput>() {
            Ok(input) => self.lookup(&input.city).await,
            Err(e) => {
                let raw = call.arguments.get("city").map(ToString::to_string).unwrap_or_default();
                Err(format!("Error: failed to fetch weather for '{raw}': {e}"))
            }
        };

        Ok(match outcome {
            Ok(text) => ToolResult::success(TOOL_NAME, text),
            Err(text) => ToolResult::failure(TOOL_NAME, text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::OpenWeatherClient;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tool_for(server: &MockServer, key: Option<&str>) -> WeatherLookupTool {
        let client = OpenWeatherClient::new(key.map(String::from), server.uri());
        WeatherLookupTool::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_success_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "Paris",
                "weather": [{"description": "light rain"}],
                "main": {"temp": 12.34}
            })))
            .mount(&server)
            .await;

        let result = tool_for(&server, Some("k"))
            .execute(&ToolCall::new(TOOL_NAME).with_arg("city", "Paris"))
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.output, "Weather in Paris: light rain, temperature 12.3°C.");
    }

    #[tokio::test]
    async fn test_missing_key_is_in_band_and_offline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = tool_for(&server, None)
            .execute(&ToolCall::new(TOOL_NAME).with_arg("city", "Paris"))
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.output, "Error: the weather service API key is not configured.");
    }

    #[tokio::test]
    async fn test_unknown_city_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let message = tool_for(&server, Some("k")).lookup("Atlantis").await.unwrap_err();
        assert_eq!(message, "Error: city 'Atlantis' was not found.");
    }

    #[tokio::test]
    async fn test_service_failure_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let message = tool_for(&server, Some("k")).lookup("Oslo").await.unwrap_err();
        assert!(message.starts_with("Error: failed to fetch weather for 'Oslo': "));
    }

    #[tokio::test]
    async fn test_blank_city_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let message = tool_for(&server, Some("k")).lookup("  ").await.unwrap_err();
        assert_eq!(message, "Error: a city name is required.");
    }

    #[tokio::test]
    async fn test_wrong_argument_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = tool_for(&server, Some("k"))
            .execute(&ToolCall::new(TOOL_NAME).with_arg("city", 42))
            .await
            .unwrap();

        assert!(!result.success);
        assert!(result.output.starts_with("Error: failed to fetch weather for '42': "));
    }
}
