//! Assistant Configuration
//!
//! Settings for the three tools, read from the environment at startup.

use std::path::PathBuf;

const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_KNOWLEDGE_BASE_PATH: &str = "docs/travel_guide.pdf";

/// Tool configuration
#[derive(Clone, Debug)]
pub struct AssistantConfig {
    /// Weather provider API key (`None` disables the weather tool in-band)
    pub weather_api_key: Option<String>,

    /// Weather API base URL, without trailing slash
    pub weather_base_url: String,

    /// Source document for the knowledge base
    pub knowledge_base_path: PathBuf,

    /// Maximum chunk length in characters
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks
    pub chunk_overlap: usize,

    /// Number of chunks returned per query
    pub top_k: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            weather_base_url: DEFAULT_WEATHER_BASE_URL.into(),
            knowledge_base_path: PathBuf::from(DEFAULT_KNOWLEDGE_BASE_PATH),
            chunk_size: 1000,
            chunk_overlap: 0,
            top_k: 3,
        }
    }
}

impl AssistantConfig {
    /// Read `OPENWEATHER_API_KEY`, `OPENWEATHER_BASE_URL` and
    /// `KNOWLEDGE_BASE_PATH`. Nothing here is required.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            weather_api_key: std::env::var("OPENWEATHER_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            weather_base_url: std::env::var("OPENWEATHER_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.weather_base_url),
            knowledge_base_path: std::env::var("KNOWLEDGE_BASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.knowledge_base_path),
            ..defaults
        }
    }
}
