//! OpenAI-compatible generator implementation for Taskbrief
//!
//! This module implements the Generator trait against the widely-cloned
//! chat completions API. Requests ask for `json_object` responses so
//! flows can decode structured output directly. The API key is read from
//! an environment variable named in configuration and never written to
//! disk.

use crate::config::OpenAiConfig;
use crate::error::{Result, TaskbriefError};
use crate::providers::{GenerationResponse, Generator, TokenUsage};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible API generator
///
/// The `api_base` from configuration is used to build the completions
/// endpoint, which allows tests to point the generator at a mock server.
/// No request timeout is set; a call waits for the service's response or
/// a transport failure.
pub struct OpenAiGenerator {
    client: Client,
    config: OpenAiConfig,
    api_key: String,
}

/// Request structure for the chat completions endpoint
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    stream: bool,
}

/// Message structure for the chat completions API
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response format selector (`{"type": "json_object"}`)
#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

/// Response structure from the chat completions endpoint
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}

impl OpenAiGenerator {
    /// Create a new OpenAI-compatible generator instance
    ///
    /// # Errors
    ///
    /// Returns error if the API key environment variable named in the
    /// configuration is unset, or if HTTP client initialization fails
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            TaskbriefError::MissingCredentials(format!(
                "openai (set {} in the environment)",
                config.api_key_env
            ))
        })?;

        let client = Client::builder()
            .user_agent("taskbrief/0.2.0")
            .build()
            .map_err(|e| {
                TaskbriefError::Provider(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!(
            "Initialized OpenAI-compatible generator: api_base={}, model={}",
            config.api_base,
            config.model
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
            stream: false,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        );
        tracing::debug!("Sending generation request: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Completion request failed: {}", e);
                TaskbriefError::Provider(format!("Completion request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("API returned error {}: {}", status, error_text);
            return Err(TaskbriefError::Provider(format!(
                "API returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse completion response: {}", e);
            TaskbriefError::Provider(format!("Failed to parse completion response: {}", e))
        })?;

        let choice = body.choices.into_iter().next().ok_or_else(|| {
            TaskbriefError::Provider("Completion response contained no choices".to_string())
        })?;

        let usage = body
            .usage
            .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens));

        Ok(GenerationResponse {
            text: choice.message.content,
            usage,
        })
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }
}
