//! OpenAI LLM Provider
//!
//! Implementation of `LlmProvider` and `EmbeddingProvider` for the OpenAI
//! Chat Completions and Embeddings APIs (or any compatible endpoint).

use std::collections::HashMap;
use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    message::{Message, Role},
    provider::{
        Completion, EmbeddingProvider, FinishReason, GenerationOptions, LlmProvider, TokenUsage,
    },
    tool::{ToolCall, ToolSchema},
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// OpenAI provider configuration
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// API key sent as a bearer token
    pub api_key: String,

    /// API base URL, without trailing slash
    pub base_url: String,

    /// Model used for embeddings
    pub embedding_model: String,

    /// Maximum inputs per embeddings request
    pub embedding_batch_size: usize,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.into(),
            embedding_batch_size: 256,
            timeout_secs: 120,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Read `OPENAI_API_KEY`, `OPENAI_BASE_URL` and `OPENAI_EMBEDDING_MODEL`.
    /// A missing or empty API key is a configuration error.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentError::Config("OPENAI_API_KEY is not set".into()))?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        if let Ok(model) = std::env::var("OPENAI_EMBEDDING_MODEL") {
            config.embedding_model = model;
        }

        Ok(config)
    }
}

/// OpenAI chat and embeddings provider
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(OpenAiConfig::from_env()?)
    }

    pub const fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Convert agent messages to the chat wire format
    fn convert_messages(messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .map(|m| match m.role {
                Role::Assistant if m.has_tool_calls() => {
                    let calls: Vec<Value> = m.tool_calls.iter().map(convert_tool_call).collect();
                    let content = if m.content.is_empty() {
                        Value::Null
                    } else {
                        Value::String(m.content.clone())
                    };
                    json!({ "role": "assistant", "content": content, "tool_calls": calls })
                }
                Role::Tool => json!({
                    "role": "tool",
                    "tool_call_id": m.tool_call_id.clone().unwrap_or_default(),
                    "content": m.content,
                }),
                role => json!({ "role": role.to_string(), "content": m.content }),
            })
            .collect()
    }

    fn convert_tools(tools: &[ToolSchema]) -> Vec<Value> {
        tools
            .iter()
            .map(|t| {
                json!({
                    "type": "function",
                    "function": {
                        "name": t.name,
                        "description": t.description,
                        "parameters": t.parameters_json_schema(),
                    }
                })
            })
            .collect()
    }

    fn build_chat_body(
        messages: &[Message],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> Value {
        let mut body = json!({
            "model": options.model,
            "messages": Self::convert_messages(messages),
            "temperature": options.temperature,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(max) = options.max_tokens {
                obj.insert("max_tokens".into(), max.into());
            }
            if !tools.is_empty() {
                obj.insert("tools".into(), Self::convert_tools(tools).into());
            }
        }

        body
    }

    /// Convert a chat response to an agent completion
    fn convert_completion(response: ChatResponse, model: &str) -> Result<Completion> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AgentError::Parse("No choices in chat response".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| {
                let arguments: HashMap<String, Value> = serde_json::from_str(&tc.function.arguments)
                    .unwrap_or_else(|e| {
                        tracing::warn!(tool = %tc.function.name, error = %e, "Unparseable tool arguments");
                        HashMap::new()
                    });
                ToolCall {
                    name: tc.function.name,
                    arguments,
                    id: Some(tc.id),
                }
            })
            .collect();

        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            tool_calls,
            model: response.model.unwrap_or_else(|| model.to_string()),
            usage: response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason.as_deref().and_then(parse_finish_reason),
        })
    }

    async fn post(&self, path: &str, body: &Value) -> Result<reqwest::Response> {
        let url = format!("{}/{path}", self.config.base_url);

        let response = self.client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(status_error(status.as_u16(), &text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let body = json!({
            "model": self.config.embedding_model,
            "input": texts,
        });

        let response: EmbeddingResponse = self.post("embeddings", &body)
            .await?
            .json()
            .await
            .map_err(|e| AgentError::Parse(e.to_string()))?;

        if response.data.len() != texts.len() {
            return Err(AgentError::Parse(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        let mut data = response.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "OpenAI"
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let body = Self::build_chat_body(messages, tools, options);

        tracing::debug!(model = %options.model, messages = messages.len(), tools = tools.len(), "Chat completion request");

        let response: ChatResponse = self.post("chat/completions", &body)
            .await?
            .json()
            .await
            .map_err(|e| AgentError::Parse(e.to_string()))?;

        Self::convert_completion(response, &options.model)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.config.embedding_batch_size.max(1)) {
            tracing::debug!(inputs = batch.len(), model = %self.config.embedding_model, "Embedding request");
            vectors.extend(self.embed_batch(batch).await?);
        }

        Ok(vectors)
    }
}

fn convert_tool_call(call: &ToolCall) -> Value {
    json!({
        "id": call.id.clone().unwrap_or_default(),
        "type": "function",
        "function": {
            "name": call.name,
            "arguments": serde_json::to_string(&call.arguments).unwrap_or_else(|_| "{}".into()),
        }
    })
}

fn parse_finish_reason(s: &str) -> Option<FinishReason> {
    match s {
        "stop" => Some(FinishReason::Stop),
        "length" => Some(FinishReason::Length),
        "tool_calls" | "function_call" => Some(FinishReason::ToolUse),
        "content_filter" => Some(FinishReason::ContentFilter),
        _ => None,
    }
}

fn transport_error(err: reqwest::Error) -> AgentError {
    if err.is_connect() || err.is_timeout() {
        AgentError::ProviderUnavailable(err.to_string())
    } else {
        AgentError::Provider(err.to_string())
    }
}

fn status_error(status: u16, body: &str) -> AgentError {
    let detail = format!("HTTP {status}: {body}");
    match status {
        401 | 403 => AgentError::Auth(detail),
        429 => AgentError::RateLimited(detail),
        500..=599 => AgentError::ProviderUnavailable(detail),
        _ => AgentError::Provider(detail),
    }
}

// Wire response types

#[derive(Deserialize)]
struct ChatResponse {
    model: Option<String>,
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    arguments: String,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}
