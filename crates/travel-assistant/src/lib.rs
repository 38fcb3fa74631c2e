//! # travel-assistant
//!
//! Travel assistant domain: the tools the agent can call and the services
//! behind them.
//!
//! ## Tools
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  get_weather            → WeatherClient (OpenWeatherMap)    │
//! │  search_knowledge_base  → KnowledgeBase                     │
//! │                             load → split → embed → index    │
//! │  analyze_data           → pure statistics, no I/O           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every tool reports failures as text in its `ToolResult`, so a missing
//! API key or an unknown city never ends the conversation.

pub mod config;
pub mod error;
pub mod knowledge;
pub mod svckit;
pub mod weather;

use std::sync::Arc;

use agent_core::{EmbeddingProvider, ToolRegistry};

pub use config::AssistantConfig;
pub use error::{AssistantError, Result};
pub use knowledge::KnowledgeBase;
pub use weather::{OpenWeatherClient, WeatherClient, WeatherReport};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{
        DataAnalysisTool,
        KnowledgeSearchTool,
        WeatherLookupTool,
    };
}

/// System prompt for the travel assistant agent
pub const TRAVEL_ASSISTANT_PROMPT: &str = "You are an all-round travel assistant. \
You can check the weather, answer questions from the travel knowledge base, \
and perform simple data analysis. Please answer the user's questions in a friendly way.";

/// The closed set of tools the assistant offers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolKind {
    Weather,
    KnowledgeBase,
    DataAnalysis,
}

impl ToolKind {
    pub const ALL: [Self; 3] = [Self::KnowledgeBase, Self::Weather, Self::DataAnalysis];

    /// Name the model uses to call the tool
    pub const fn name(self) -> &'static str {
        match self {
            Self::Weather => svckit::weather_lookup::TOOL_NAME,
            Self::KnowledgeBase => svckit::knowledge_search::TOOL_NAME,
            Self::DataAnalysis => svckit::data_analysis::TOOL_NAME,
        }
    }
}

/// Services the tools are built from
pub struct ToolDeps {
    pub config: AssistantConfig,
    pub weather: Arc<dyn WeatherClient>,

    /// `None` when no OpenAI key is configured; the knowledge tool then
    /// answers with a configuration error.
    pub embedder: Option<Arc<dyn EmbeddingProvider>>,
}

impl ToolDeps {
    /// Default services for a configuration: OpenWeatherMap for weather
    pub fn new(config: AssistantConfig, embedder: Option<Arc<dyn EmbeddingProvider>>) -> Self {
        let weather = Arc::new(OpenWeatherClient::from_config(&config));
        Self { config, weather, embedder }
    }
}

/// Registry holding all three travel tools
pub fn build_registry(deps: ToolDeps) -> ToolRegistry {
    let knowledge = Arc::new(KnowledgeBase::from_config(&deps.config, deps.embedder));

    let mut registry = ToolRegistry::new();
    for kind in ToolKind::ALL {
        tracing::debug!(tool = kind.name(), "Registering tool");
        match kind {
            ToolKind::Weather => registry.register(tools::WeatherLookupTool::new(deps.weather.clone())),
            ToolKind::KnowledgeBase => {
                registry.register(tools::KnowledgeSearchTool::new(knowledge.clone()));
            }
            ToolKind::DataAnalysis => registry.register(tools::DataAnalysisTool::new()),
        }
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_has_every_tool() {
        let registry = build_registry(ToolDeps::new(AssistantConfig::default(), None));

        assert_eq!(registry.len(), ToolKind::ALL.len());
        for kind in ToolKind::ALL {
            assert!(registry.get(kind.name()).is_some(), "{kind:?} not registered");
        }
        assert_eq!(registry.names(), ["analyze_data", "get_weather", "search_knowledge_base"]);
    }

    #[tokio::test]
    async fn test_unconfigured_tools_answer_in_band() {
        let config = AssistantConfig {
            knowledge_base_path: "does/not/exist.pdf".into(),
            ..AssistantConfig::default()
        };
        let registry = build_registry(ToolDeps::new(config, None));

        let weather = registry
            .execute(&agent_core::ToolCall::new("get_weather").with_arg("city", "Rome"))
            .await
            .unwrap();
        assert_eq!(weather.output, "Error: the weather service API key is not configured.");

        let search = registry
            .execute(&agent_core::ToolCall::new("search_knowledge_base").with_arg("query", "visa"))
            .await
            .unwrap();
        assert_eq!(
            search.output,
            "Error: the OpenAI API key has not been configured by the administrator."
        );
    }
}
