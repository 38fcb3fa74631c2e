//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM provider error
    #[error("Provider error: {0}")]
    Provider(String),
    
    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),
    
    /// Tool not found in registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),
    
    /// Tool validation failed
    #[error("Tool validation error: {0}")]
    ToolValidation(String),
    
    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),
    
    /// Maximum iterations reached in reasoning loop
    #[error("Maximum iterations ({0}) reached")]
    MaxIterations(usize),
    
    /// Parse error (e.g., malformed provider response)
    #[error("Parse error: {0}")]
    Parse(String),
    
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
    
    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),
    
    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),
    
    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider(msg) => format!("The AI service encountered an error: {msg}"),
            Self::ProviderUnavailable(_) => "The AI service is currently unavailable. Please try again.".into(),
            Self::ToolNotFound(name) => format!("The tool '{name}' is not available."),
            Self::ToolValidation(msg) => format!("Invalid tool input: {msg}"),
            Self::ToolExecution(msg) => format!("Tool error: {msg}"),
            Self::MaxIterations(_) => "The request took too long to process. Please try a simpler query.".into(),
            Self::RateLimited(_) => "You've made too many requests. Please wait a moment.".into(),
            Self::Auth(_) => "Authentication failed. Please check your credentials.".into(),
            Self::Config(msg) => format!("The assistant is misconfigured: {msg}"),
            _ => "An unexpected error occurred.".into(),
        }
    }
}
