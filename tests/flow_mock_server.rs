//! Flow tests against mock provider servers
//!
//! Drives both flows end to end through real HTTP providers pointed at
//! wiremock servers, covering the happy path, transport failures, and
//! output-validation failures.

use taskbrief::config::{OllamaConfig, OpenAiConfig};
use taskbrief::flows::relevance::{self, RelevanceInput};
use taskbrief::flows::summarize::{self, SummarizeInput};
use taskbrief::flows::FlowError;
use taskbrief::providers::{Generator, OllamaGenerator, OpenAiGenerator};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ollama_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "message": {"role": "assistant", "content": content},
        "done": true,
        "prompt_eval_count": 42,
        "eval_count": 17
    })
}

fn openai_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}],
        "usage": {"prompt_tokens": 42, "completion_tokens": 17, "total_tokens": 59}
    })
}

fn ollama_generator(server: &MockServer) -> OllamaGenerator {
    OllamaGenerator::new(OllamaConfig {
        host: server.uri(),
        model: "llama3.2:latest".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_summarize_flow_over_ollama() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_reply(
            r#"{"summary": "Wrap up the errands, then tackle the filings."}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let generator = ollama_generator(&server);
    let input = SummarizeInput::new(vec!["Buy milk".to_string(), "File taxes".to_string()]);

    let output = summarize::run(&generator, &input).await.unwrap();
    assert_eq!(
        output.summary,
        "Wrap up the errands, then tackle the filings."
    );
}

#[tokio::test]
async fn test_summarize_flow_reports_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("kaboom"))
        .mount(&server)
        .await;

    let generator = ollama_generator(&server);
    let input = SummarizeInput::new(vec!["Buy milk".to_string()]);

    let err = summarize::run(&generator, &input).await.unwrap_err();
    assert!(matches!(err, FlowError::Transport(_)));
}

#[tokio::test]
async fn test_summarize_flow_reports_invalid_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ollama_reply("Sorry, I cannot produce JSON today.")),
        )
        .mount(&server)
        .await;

    let generator = ollama_generator(&server);
    let input = SummarizeInput::new(vec!["Buy milk".to_string()]);

    let err = summarize::run(&generator, &input).await.unwrap_err();
    assert!(matches!(err, FlowError::InvalidOutput(_)));
}

#[tokio::test]
async fn test_relevance_flow_over_openai() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer flow-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_reply(
            r#"{"is_relevant": true, "reason": "Production impact affects the whole team."}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    std::env::set_var("TASKBRIEF_FLOW_TEST_KEY", "flow-test-key");
    let generator = OpenAiGenerator::new(OpenAiConfig {
        api_base: server.uri(),
        model: "gpt-4o-mini".to_string(),
        api_key_env: "TASKBRIEF_FLOW_TEST_KEY".to_string(),
    })
    .unwrap();

    let input = RelevanceInput::new(
        "Fix critical production bug",
        "- [pending] Water the plants\n- [pending] Order supplies",
    );

    let output = relevance::run(&generator, &input).await.unwrap();
    assert!(output.is_relevant);
    assert!(!output.reason.is_empty());
}

#[tokio::test]
async fn test_relevance_flow_rejects_partial_output_from_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(ollama_reply(r#"{"is_relevant": true}"#)),
        )
        .mount(&server)
        .await;

    let generator = ollama_generator(&server);
    let input = RelevanceInput::new("Fix bug", "context");

    let err = relevance::run(&generator, &input).await.unwrap_err();
    assert!(matches!(err, FlowError::InvalidOutput(_)));
}

#[tokio::test]
async fn test_generator_reports_token_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_reply(r#"{"ok": true}"#)))
        .mount(&server)
        .await;

    let generator = ollama_generator(&server);
    let response = generator.generate("prompt").await.unwrap();

    let usage = response.usage.unwrap();
    assert_eq!(usage.prompt_tokens, 42);
    assert_eq!(usage.completion_tokens, 17);
    assert_eq!(usage.total_tokens, 59);
}
