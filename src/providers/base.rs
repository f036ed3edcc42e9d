//! Base generator trait and common types for Taskbrief
//!
//! This module defines the Generator trait that all generation providers
//! must implement, along with the response and token-usage types shared
//! across implementations.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Token usage information from a generation call
///
/// Tracks the number of tokens used in prompts and completions,
/// as reported by the provider.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use taskbrief::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        let total_tokens = prompt_tokens + completion_tokens;
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

/// Result of a single generation call
#[derive(Debug, Clone)]
pub struct GenerationResponse {
    /// Raw text returned by the model
    pub text: String,
    /// Optional token usage information
    pub usage: Option<TokenUsage>,
}

impl GenerationResponse {
    /// Create a response without usage information
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    /// Create a response with token usage
    pub fn with_usage(text: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            text: text.into(),
            usage: Some(usage),
        }
    }
}

/// Generator trait for generation providers
///
/// All providers (Ollama, OpenAI-compatible, etc.) implement this trait.
/// A call is a single round trip: one prompt in, the model's raw text
/// out. There is no retry, no streaming, and no partial result; callers
/// that need structured output decode and validate the returned text
/// themselves.
///
/// # Examples
///
/// ```no_run
/// use taskbrief::providers::{GenerationResponse, Generator};
/// use taskbrief::error::Result;
/// use async_trait::async_trait;
///
/// struct MyGenerator;
///
/// #[async_trait]
/// impl Generator for MyGenerator {
///     async fn generate(&self, _prompt: &str) -> Result<GenerationResponse> {
///         Ok(GenerationResponse::new(r#"{"summary": "All quiet."}"#))
///     }
///
///     fn model(&self) -> String {
///         "example".to_string()
///     }
/// }
/// ```
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for the given prompt
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or the response is invalid
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse>;

    /// Name of the model this generator is configured to use
    fn model(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_usage_new() {
        let usage = TokenUsage::new(100, 50);
        assert_eq!(usage.prompt_tokens, 100);
        assert_eq!(usage.completion_tokens, 50);
        assert_eq!(usage.total_tokens, 150);
    }

    #[test]
    fn test_token_usage_zero() {
        let usage = TokenUsage::new(0, 0);
        assert_eq!(usage.total_tokens, 0);
    }

    #[test]
    fn test_token_usage_serialization() {
        let usage = TokenUsage::new(100, 50);
        let json = serde_json::to_string(&usage).unwrap();
        let deserialized: TokenUsage = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.prompt_tokens, 100);
        assert_eq!(deserialized.completion_tokens, 50);
    }

    #[test]
    fn test_generation_response_new() {
        let response = GenerationResponse::new("hello");
        assert_eq!(response.text, "hello");
        assert!(response.usage.is_none());
    }

    #[test]
    fn test_generation_response_with_usage() {
        let response = GenerationResponse::with_usage("hello", TokenUsage::new(10, 5));
        assert_eq!(response.text, "hello");
        assert_eq!(response.usage.unwrap().total_tokens, 15);
    }

    #[test]
    fn test_generator_usable_as_trait_object() {
        struct Fixed;

        #[async_trait]
        impl Generator for Fixed {
            async fn generate(&self, _prompt: &str) -> Result<GenerationResponse> {
                Ok(GenerationResponse::new("{}"))
            }

            fn model(&self) -> String {
                "fixed".to_string()
            }
        }

        let generator: Box<dyn Generator> = Box::new(Fixed);
        let response = tokio_test::block_on(generator.generate("hi")).unwrap();
        assert_eq!(response.text, "{}");
        assert_eq!(generator.model(), "fixed");
    }
}
