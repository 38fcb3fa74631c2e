//! Travel Assistant CLI
//!
//! Interactive terminal front end. The conversation uses stdin/stdout;
//! logs go to stderr.

mod repl;

use std::sync::Arc;

use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{AgentBuilder, EmbeddingProvider, MemorySessionStore, SessionId};
use agent_runtime::OpenAiProvider;
use travel_assistant::{build_registry, AssistantConfig, ToolDeps, TRAVEL_ASSISTANT_PROMPT};

const SESSION_ID: &str = "user123";
const DEFAULT_MODEL: &str = "gpt-4-turbo";
const DEFAULT_LOG_FILTER: &str = "info";

/// Filter directive for the subscriber; blank or unset falls back to `info`
fn log_filter(rust_log: Option<String>) -> String {
    rust_log
        .filter(|directive| !directive.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.into())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment first so `.env` can set RUST_LOG too
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter(std::env::var("RUST_LOG").ok())))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    // Without a model credential there is no assistant
    let provider = Arc::new(OpenAiProvider::from_env()?);
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
    tracing::info!(model = %model, base_url = %provider.config().base_url, "✓ OpenAI provider configured");

    let config = AssistantConfig::from_env();
    if config.weather_api_key.is_none() {
        tracing::warn!("⚠ OPENWEATHER_API_KEY not set - weather lookups will report an error");
    }

    let embedder: Arc<dyn EmbeddingProvider> = provider.clone();
    let tools = build_registry(ToolDeps::new(config, Some(embedder)));

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    let agent = AgentBuilder::new()
        .provider(provider)
        .tools(tools)
        .system_prompt(TRAVEL_ASSISTANT_PROMPT)
        .model(model)
        .temperature(0.0)
        .build()?;

    let mut store = MemorySessionStore::new();
    let session_id = SessionId::from(SESSION_ID);

    repl::run(
        &agent,
        &mut store,
        &session_id,
        BufReader::new(tokio::io::stdin()),
        &mut tokio::io::stdout(),
    )
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_filter_default() {
        assert_eq!(log_filter(None), "info");
        assert_eq!(log_filter(Some("  ".into())), "info");
        assert_eq!(log_filter(Some("travel_assistant=debug".into())), "travel_assistant=debug");
    }

    #[test]
    fn test_env_file_sets_log_filter() {
        let contents = b"OPENAI_API_KEY=sk-test\nRUST_LOG=agent_core=debug\n";
        let rust_log = dotenvy::from_read_iter(&contents[..])
            .filter_map(Result::ok)
            .find_map(|(key, value)| (key == "RUST_LOG").then_some(value));

        assert_eq!(log_filter(rust_log), "agent_core=debug");
    }
}
