//! Reasoning Loop
//!
//! Implements the tool-calling agent cycle: the model sees the conversation,
//! either answers or requests tools, tool results are fed back, and the
//! model is invoked again until it produces a final answer.

use std::sync::Arc;

use crate::error::{AgentError, Result};
use crate::message::{Conversation, Message, Role};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::session::{SessionId, SessionStore};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt
    pub system_prompt: String,

    /// Maximum model invocations per turn before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. \
Use the available tools when they help answer the question, then answer concisely.";

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Build the full system prompt. Tool descriptions are only spelled out
    /// for providers that cannot take them as function definitions.
    fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();

        if !self.provider.supports_tools() && !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
        }

        prompt
    }

    /// Answer one user input within a session.
    ///
    /// The model sees the system prompt, the session's prior turns and the
    /// new input. Only the input and the final answer are written back to
    /// the session; a failed turn leaves the session untouched.
    pub async fn chat<S>(&self, store: &mut S, session_id: &SessionId, input: &str) -> Result<String>
    where
        S: SessionStore + ?Sized,
    {
        let history = store.get_or_create(session_id).messages().to_vec();
        tracing::debug!(session = %session_id, prior = history.len(), "Starting turn");

        let mut conversation = Conversation::with_system_prompt(self.build_system_prompt());
        conversation.extend(history);
        conversation.push(Message::user(input));

        let answer = self.run(&mut conversation).await?;

        store.get_or_create(session_id).append_turn(input, answer.clone());
        Ok(answer)
    }

    /// Run the agent loop over a prepared conversation
    pub async fn run(&self, conversation: &mut Conversation) -> Result<String> {
        if conversation.messages().first().map(|m| m.role) != Some(Role::System) {
            let mut with_system = Conversation::with_system_prompt(self.build_system_prompt());
            with_system.extend(conversation.messages().iter().cloned());
            *conversation = with_system;
        }

        let native = self.provider.supports_tools();
        let schemas = if native { self.tools.schemas() } else { Vec::new() };

        for iteration in 1..=self.config.max_iterations {
            let completion = self.provider
                .complete(conversation.messages(), &schemas, &self.config.generation)
                .await?;

            let mut calls = if native {
                completion.tool_calls
            } else {
                Self::parse_tool_call(&completion.content).into_iter().collect()
            };

            if calls.is_empty() {
                conversation.push(Message::assistant(&completion.content));
                return Ok(completion.content);
            }

            for call in &mut calls {
                if call.id.is_none() {
                    call.id = Some(uuid::Uuid::new_v4().to_string());
                }
            }

            conversation.push(Message::assistant_tool_calls(&completion.content, calls.clone()));

            for call in &calls {
                tracing::debug!(tool = %call.name, iteration, "Executing tool");

                let result = self.execute_tool(call).await;
                let content = if native {
                    result.output
                } else {
                    Self::format_tool_result(&result)
                };
                conversation.push(Message::tool(content, call.id.clone()));
            }
        }

        Err(AgentError::MaxIterations(self.config.max_iterations))
    }

    /// Run with a simple string input (no session memory)
    pub async fn ask(&self, question: &str) -> Result<String> {
        let mut conversation = Conversation::with_system_prompt(self.build_system_prompt());
        conversation.push(Message::user(question));
        self.run(&mut conversation).await
    }

    /// Parse a tool call from the text of a response
    fn parse_tool_call(content: &str) -> Option<ToolCall> {
        // Look for ```tool ... ``` blocks
        let tool_start = "```tool";
        let tool_end = "```";

        if let Some(start_idx) = content.find(tool_start) {
            let after_marker = &content[start_idx + tool_start.len()..];
            if let Some(end_idx) = after_marker.find(tool_end) {
                let json_str = after_marker[..end_idx].trim();
                if let Ok(call) = serde_json::from_str::<ToolCall>(json_str) {
                    return Some(call);
                }
            }
        }

        // Fallback: raw JSON with a "tool" key
        Self::parse_inline_tool_call(content)
    }

    fn parse_inline_tool_call(content: &str) -> Option<ToolCall> {
        if !content.contains(r#""tool""#) {
            return None;
        }

        let start = content.find('{')?;
        let end = content.rfind('}')?;

        if end <= start {
            return None;
        }

        serde_json::from_str::<ToolCall>(&content[start..=end]).ok()
    }

    /// Execute a tool call; registry errors become failed results
    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        match self.tools.execute(call).await {
            Ok(mut result) => {
                result.id.clone_from(&call.id);
                result
            }
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool call rejected");
                ToolResult {
                    name: call.name.clone(),
                    id: call.id.clone(),
                    success: false,
                    output: format!("Error: {e}"),
                }
            }
        }
    }

    /// Format tool result for text-only providers
    fn format_tool_result(result: &ToolResult) -> String {
        if result.success {
            format!("[Tool '{}' returned]\n{}", result.name, result.output)
        } else {
            format!("[Tool '{}' failed]\n{}", result.name, result.output)
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub const fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub const fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self.provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}
