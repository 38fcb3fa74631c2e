//! Weather Integration
//!
//! Abstraction over current-weather services.

mod openweather;

pub use openweather::OpenWeatherClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Current conditions for one city, derived from a single API response
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// City name as reported by the service
    pub city: String,

    /// Short condition text (e.g., "light rain")
    pub description: String,

    /// Temperature in degrees Celsius
    pub temperature_c: f64,
}

/// Weather client trait (Strategy pattern)
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Current weather for a city.
    ///
    /// Fails with `MissingCredential` before any request when the client is
    /// not configured, and with `CityNotFound` when the service does not
    /// know the city.
    async fn current(&self, city: &str) -> Result<WeatherReport>;

    /// Service name
    fn name(&self) -> &str;
}
