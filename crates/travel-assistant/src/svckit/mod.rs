//! Service Kit - Agent Tools
//!
//! Domain-specific tools that implement `agent_core::Tool` for the travel assistant.

pub mod weather_lookup;
pub mod knowledge_search;
pub mod data_analysis;

pub use weather_lookup::WeatherLookupTool;
pub use knowledge_search::KnowledgeSearchTool;
pub use data_analysis::{analyze, AnalysisError, AnalysisReport, DataAnalysisTool};
