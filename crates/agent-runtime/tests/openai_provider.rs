use agent_core::provider::{EmbeddingProvider, GenerationOptions, LlmProvider};
use agent_core::tool::{ParameterSchema, ToolSchema};
use agent_core::{AgentError, Message};
use agent_runtime::{OpenAiConfig, OpenAiProvider};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> OpenAiProvider {
    let mut config = OpenAiConfig::new("test-key").with_base_url(server.uri());
    config.embedding_batch_size = 2;
    OpenAiProvider::from_config(config).expect("client should build")
}

fn weather_schema() -> ToolSchema {
    ToolSchema {
        name: "get_weather".into(),
        description: "Current weather for a city".into(),
        parameters: vec![ParameterSchema::required_string("city", "City name")],
        has_side_effects: false,
    }
}

#[tokio::test]
async fn chat_completion_returns_tool_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4-turbo",
            "tools": [{"type": "function", "function": {"name": "get_weather"}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4-turbo-2024-04-09",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "get_weather", "arguments": "{\"city\":\"Beijing\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 50, "completion_tokens": 10, "total_tokens": 60}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let completion = provider(&server)
        .complete(
            &[Message::user("Weather in Beijing?")],
            &[weather_schema()],
            &GenerationOptions::default(),
        )
        .await
        .expect("completion should succeed");

    assert_eq!(completion.content, "");
    assert_eq!(completion.model, "gpt-4-turbo-2024-04-09");
    assert_eq!(completion.tool_calls.len(), 1);
    let call = &completion.tool_calls[0];
    assert_eq!(call.name, "get_weather");
    assert_eq!(call.id.as_deref(), Some("call_abc"));
    assert_eq!(call.arguments["city"], "Beijing");
    assert_eq!(completion.usage.map(|u| u.total_tokens), Some(60));
}

#[tokio::test]
async fn chat_completion_maps_auth_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = provider(&server)
        .complete(&[Message::user("hi")], &[], &GenerationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::Auth(msg) if msg.contains("invalid api key")));
}

#[tokio::test]
async fn embeddings_are_batched_and_ordered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_partial_json(json!({"input": ["a", "b"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"index": 1, "embedding": [0.0, 1.0]},
                {"index": 0, "embedding": [1.0, 0.0]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(body_partial_json(json!({"input": ["c"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"index": 0, "embedding": [0.5, 0.5]}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let vectors = provider(&server).embed(&texts).await.expect("embeddings");

    assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.5, 0.5]]);
}

#[tokio::test]
async fn embeddings_reject_short_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let err = provider(&server).embed_query("hello").await.unwrap_err();
    assert!(matches!(err, AgentError::Parse(_)));
}
