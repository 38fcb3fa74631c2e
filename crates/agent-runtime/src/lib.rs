//! # agent-runtime
//!
//! Runtime providers for the travel agent.
//!
//! ## Providers
//!
//! - **OpenAI** (default): Chat Completions with native function calling,
//!   plus the Embeddings API. Any OpenAI-compatible endpoint works through
//!   `OPENAI_BASE_URL`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::openai::OpenAiProvider;
//!
//! let provider = Arc::new(OpenAiProvider::from_env()?);
//! let agent = AgentBuilder::new()
//!     .provider(provider.clone())
//!     .build()?;
//! ```

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, EmbeddingProvider, LlmProvider, Message, Result, Role, Tool, ToolRegistry,
};
