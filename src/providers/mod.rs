//! Generation provider module for Taskbrief
//!
//! This module contains the generator abstraction and implementations
//! for Ollama and OpenAI-compatible endpoints.

pub mod base;
pub mod ollama;
pub mod openai;

pub use base::{GenerationResponse, Generator, TokenUsage};
pub use ollama::OllamaGenerator;
pub use openai::OpenAiGenerator;

use crate::config::ProviderConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create a generator instance based on configuration
///
/// # Arguments
///
/// * `config` - Provider configuration
///
/// # Returns
///
/// Returns a shared generator handle, ready to be injected into flows
///
/// # Errors
///
/// Returns error if the provider type is invalid or initialization fails
pub fn create_generator(config: &ProviderConfig) -> Result<Arc<dyn Generator>> {
    create_generator_with_override(config, None, None)
}

/// Create a generator instance with optional overrides
///
/// Used by commands that accept `--provider` / `--model` flags to run a
/// one-off action against a different backend than the configured one.
///
/// # Arguments
///
/// * `config` - Full provider configuration
/// * `provider_override` - Optional provider type override ("ollama" or "openai")
/// * `model_override` - Optional model name override
///
/// # Errors
///
/// Returns error if the provider type is invalid or initialization fails
pub fn create_generator_with_override(
    config: &ProviderConfig,
    provider_override: Option<&str>,
    model_override: Option<&str>,
) -> Result<Arc<dyn Generator>> {
    let provider_type = provider_override.unwrap_or(&config.provider_type);

    match provider_type {
        "ollama" => {
            let mut ollama_config = config.ollama.clone();
            if let Some(model) = model_override {
                ollama_config.model = model.to_string();
            }

            Ok(Arc::new(OllamaGenerator::new(ollama_config)?))
        }
        "openai" => {
            let mut openai_config = config.openai.clone();
            if let Some(model) = model_override {
                openai_config.model = model.to_string();
            }

            Ok(Arc::new(OpenAiGenerator::new(openai_config)?))
        }
        _ => Err(crate::error::TaskbriefError::Provider(format!(
            "Unknown provider type: {}",
            provider_type
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_generator_invalid_type() {
        let mut config = ProviderConfig::default();
        config.provider_type = "invalid".to_string();

        let result = create_generator(&config);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_generator_default_ollama() {
        let config = ProviderConfig::default();
        let result = create_generator(&config);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().model(), "llama3.2:latest");
    }

    #[test]
    fn test_create_generator_with_model_override() {
        let config = ProviderConfig::default();
        let result = create_generator_with_override(&config, Some("ollama"), Some("gemma2:2b"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().model(), "gemma2:2b");
    }

    #[test]
    fn test_create_generator_with_invalid_override() {
        let config = ProviderConfig::default();
        let result = create_generator_with_override(&config, Some("invalid"), None);
        assert!(result.is_err());
    }
}
