//! Ollama generator implementation for Taskbrief
//!
//! This module implements the Generator trait for Ollama, connecting to
//! a local or remote Ollama server. Requests use the chat endpoint with
//! JSON format mode so flows can decode structured output directly.

use crate::config::OllamaConfig;
use crate::error::{Result, TaskbriefError};
use crate::providers::{GenerationResponse, Generator, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Ollama API generator
///
/// Connects to an Ollama server (local or remote) and performs one
/// non-streaming chat completion per call. No request timeout is set;
/// a call waits for the server's response or a transport failure.
///
/// # Examples
///
/// ```no_run
/// use taskbrief::config::OllamaConfig;
/// use taskbrief::providers::{Generator, OllamaGenerator};
///
/// # async fn example() -> taskbrief::error::Result<()> {
/// let config = OllamaConfig {
///     host: "http://localhost:11434".to_string(),
///     model: "llama3.2:latest".to_string(),
/// };
/// let generator = OllamaGenerator::new(config)?;
/// let response = generator.generate("Say hello as JSON").await?;
/// # Ok(())
/// # }
/// ```
pub struct OllamaGenerator {
    client: Client,
    config: OllamaConfig,
}

/// Request structure for Ollama's /api/chat endpoint
#[derive(Debug, Serialize)]
struct OllamaChatRequest {
    model: String,
    messages: Vec<OllamaChatMessage>,
    stream: bool,
    format: String,
}

/// Message structure for the Ollama chat API
#[derive(Debug, Serialize, Deserialize)]
struct OllamaChatMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response structure from Ollama's /api/chat endpoint
#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaChatMessage,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl OllamaGenerator {
    /// Create a new Ollama generator instance
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("taskbrief/0.2.0")
            .build()
            .map_err(|e| {
                TaskbriefError::Provider(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!(
            "Initialized Ollama generator: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse> {
        let request = OllamaChatRequest {
            model: self.config.model.clone(),
            messages: vec![OllamaChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            format: "json".to_string(),
        };

        let url = format!("{}/api/chat", self.config.host);
        tracing::debug!("Sending generation request to Ollama: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                TaskbriefError::Provider(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(TaskbriefError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: OllamaChatResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            TaskbriefError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        let usage = TokenUsage::new(body.prompt_eval_count, body.eval_count);
        Ok(GenerationResponse::with_usage(body.message.content, usage))
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generator() {
        let config = OllamaConfig::default();
        let generator = OllamaGenerator::new(config);
        assert!(generator.is_ok());
    }

    #[test]
    fn test_host_and_model_accessors() {
        let config = OllamaConfig {
            host: "http://example.com:11434".to_string(),
            model: "gemma2:2b".to_string(),
        };
        let generator = OllamaGenerator::new(config).unwrap();
        assert_eq!(generator.host(), "http://example.com:11434");
        assert_eq!(generator.model(), "gemma2:2b");
    }

    #[test]
    fn test_request_serialization() {
        let request = OllamaChatRequest {
            model: "llama3.2:latest".to_string(),
            messages: vec![OllamaChatMessage {
                role: "user".to_string(),
                content: "hello".to_string(),
            }],
            stream: false,
            format: "json".to_string(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"model\":\"llama3.2:latest\""));
        assert!(json.contains("\"stream\":false"));
        assert!(json.contains("\"format\":\"json\""));
    }

    #[test]
    fn test_response_deserialization_defaults() {
        let json = r#"{"message": {"role": "assistant", "content": "{}"}, "done": true}"#;
        let response: OllamaChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.message.content, "{}");
        assert_eq!(response.prompt_eval_count, 0);
        assert_eq!(response.eval_count, 0);
    }
}
