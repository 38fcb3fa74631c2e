//! Knowledge Base Search Tool

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use agent_core::{
    tool::ParameterSchema,
    Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::error::AssistantError;
use crate::knowledge::KnowledgeBase;

pub const TOOL_NAME: &str = "search_knowledge_base";

#[derive(Deserialize)]
struct SearchInput {
    query: String,
}

/// Tool for answering from the travel guide document
pub struct KnowledgeSearchTool {
    knowledge: Arc<KnowledgeBase>,
}

impl KnowledgeSearchTool {
    pub fn new(knowledge: Arc<KnowledgeBase>) -> Self {
        Self { knowledge }
    }

    pub async fn search(&self, query: &str) -> Result<String, String> {
        tracing::debug!(query, "Knowledge base search");

        match self.knowledge.search(query).await {
            Ok(hits) if hits.is_empty() => {
                Ok("No relevant information was found in the knowledge base.".into())
            }
            Ok(hits) => Ok(format!(
                "Found the following relevant information in the knowledge base:\n---\n{}\n---",
                hits.join("\n\n")
            )),
            Err(e) => {
                tracing::warn!(query, error = %e, "Knowledge base search failed");
                Err(match e {
                    AssistantError::MissingCredential(_) => {
                        "Error: the OpenAI API key has not been configured by the administrator."
                            .into()
                    }
                    AssistantError::DocumentNotFound(name) => {
                        format!("Error: knowledge base document '{name}' was not found.")
                    }
                    other => format!("Error while querying the knowledge base: {other}"),
                })
            }
        }
    }
}

#[async_trait]
impl Tool for KnowledgeSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: TOOL_NAME.into(),
            description: "Use this tool when the user asks about travel policies, visas, \
                destinations, itineraries or any question the internal travel guide may \
                answer."
                .into(),
            parameters: vec![ParameterSchema::required_string(
                "query",
                "The question or keywords to look up in the travel guide",
            )],
            has_side_effects: false,
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let outcome = match call.parse_args::<SearchInput>() {
            Ok(input) => self.search(&input.query).await,
            Err(e) => Err(format!("Error while querying the knowledge base: {e}")),
        };

        Ok(match outcome {
            Ok(text) => ToolResult::success(TOOL_NAME, text),
            Err(text) => ToolResult::failure(TOOL_NAME, text),
        })
    }
}
