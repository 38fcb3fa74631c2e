//! OpenWeatherMap Client

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{WeatherClient, WeatherReport};
use crate::error::{AssistantError, Result};

/// Client for the OpenWeatherMap current weather endpoint
pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &crate::config::AssistantConfig) -> Self {
        Self::new(config.weather_api_key.clone(), config.weather_base_url.clone())
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn current(&self, city: &str) -> Result<WeatherReport> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AssistantError::MissingCredential("OPENWEATHER_API_KEY"))?;

        let url = format!("{}/weather", self.base_url);
        tracing::debug!(city, "Fetching current weather");

        let response = self.client
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(AssistantError::CityNotFound(city.to_string())),
            status if !status.is_success() => {
                return Err(AssistantError::WeatherService(format!("HTTP {status}")));
            }
            _ => {}
        }

        let body: CurrentWeather = response.json().await?;
        let condition = body
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::WeatherService("response has no conditions".into()))?;

        Ok(WeatherReport {
            city: body.name.filter(|n| !n.is_empty()).unwrap_or_else(|| city.to_string()),
            description: condition.description,
            temperature_c: body.main.temp,
        })
    }

    fn name(&self) -> &str {
        "OpenWeatherMap"
    }
}

#[derive(Deserialize)]
struct CurrentWeather {
    name: Option<String>,
    weather: Vec<Condition>,
    main: MainReadings,
}

#[derive(Deserialize)]
struct Condition {
    description: String,
}

#[derive(Deserialize)]
struct MainReadings {
    temp: f64,
}
