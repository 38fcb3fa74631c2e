//! Error Types for the Travel Assistant

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Weather service error: {0}")]
    WeatherService(String),

    #[error("Failed to load document: {0}")]
    DocumentLoad(String),

    #[error("Embedding error: {0}")]
    Embedding(#[from] agent_core::AgentError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
