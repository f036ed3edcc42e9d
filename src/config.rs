//! Configuration management for Taskbrief
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, TaskbriefError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Taskbrief
///
/// This structure holds all configuration needed by the application,
/// including generation provider settings and task store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Ollama, OpenAI-compatible)
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Task store configuration
    #[serde(default)]
    pub store: StoreConfig,
}

/// Provider configuration
///
/// Specifies which generation provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use ("ollama" or "openai")
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// OpenAI-compatible configuration
    #[serde(default)]
    pub openai: OpenAiConfig,
}

fn default_provider_type() -> String {
    "ollama".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            ollama: OllamaConfig::default(),
            openai: OpenAiConfig::default(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// OpenAI-compatible provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API base URL used to build the completions endpoint
    ///
    /// Pointing this at a local mock server is the supported way to
    /// exercise the provider in tests.
    #[serde(default = "default_openai_api_base")]
    pub api_base: String,

    /// Model to request
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,
}

fn default_openai_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: default_openai_api_base(),
            model: default_openai_model(),
            api_key_env: default_openai_api_key_env(),
        }
    }
}

/// Task store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the task database file
    ///
    /// When unset, the database lives in the user's data directory.
    /// The `TASKBRIEF_TASKS_DB` environment variable takes precedence
    /// over both.
    #[serde(default)]
    pub db_path: Option<String>,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Load configuration from a YAML file
    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TaskbriefError::Config(format!("Failed to read {}: {}", path, e)))?;
        let config: Config = serde_yaml::from_str(&contents)
            .map_err(|e| TaskbriefError::Config(format!("Failed to parse {}: {}", path, e)))?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("TASKBRIEF_PROVIDER") {
            self.provider.provider_type = provider_type;
        }
        if let Ok(host) = std::env::var("TASKBRIEF_OLLAMA_HOST") {
            self.provider.ollama.host = host;
        }
        if let Ok(model) = std::env::var("TASKBRIEF_OLLAMA_MODEL") {
            self.provider.ollama.model = model;
        }
        if let Ok(api_base) = std::env::var("TASKBRIEF_OPENAI_API_BASE") {
            self.provider.openai.api_base = api_base;
        }
        if let Ok(model) = std::env::var("TASKBRIEF_OPENAI_MODEL") {
            self.provider.openai.model = model;
        }
    }

    /// Apply CLI argument overrides
    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(store_path) = &cli.store_path {
            self.store.db_path = Some(store_path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if the provider type is unknown or required
    /// provider fields are empty
    pub fn validate(&self) -> Result<()> {
        match self.provider.provider_type.as_str() {
            "ollama" => {
                if self.provider.ollama.host.is_empty() {
                    return Err(
                        TaskbriefError::Config("Ollama host cannot be empty".to_string()).into(),
                    );
                }
                if self.provider.ollama.model.is_empty() {
                    return Err(
                        TaskbriefError::Config("Ollama model cannot be empty".to_string()).into(),
                    );
                }
            }
            "openai" => {
                if self.provider.openai.api_base.is_empty() {
                    return Err(TaskbriefError::Config(
                        "OpenAI API base cannot be empty".to_string(),
                    )
                    .into());
                }
                if self.provider.openai.model.is_empty() {
                    return Err(
                        TaskbriefError::Config("OpenAI model cannot be empty".to_string()).into(),
                    );
                }
            }
            other => {
                return Err(TaskbriefError::Config(format!(
                    "Unknown provider type: {}",
                    other
                ))
                .into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.provider_type, "ollama");
        assert_eq!(config.provider.ollama.host, "http://localhost:11434");
        assert_eq!(config.provider.ollama.model, "llama3.2:latest");
        assert_eq!(config.provider.openai.api_base, "https://api.openai.com/v1");
        assert_eq!(config.provider.openai.api_key_env, "OPENAI_API_KEY");
        assert!(config.store.db_path.is_none());
    }

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_unknown_provider() {
        let mut config = Config::default();
        config.provider.provider_type = "carrier-pigeon".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_ollama_model() {
        let mut config = Config::default();
        config.provider.ollama.model = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_openai_api_base() {
        let mut config = Config::default();
        config.provider.provider_type = "openai".to_string();
        config.provider.openai.api_base = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
provider:
  type: openai
  openai:
    model: gpt-4o
store:
  db_path: /tmp/tasks.db
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.provider.provider_type, "openai");
        assert_eq!(config.provider.openai.model, "gpt-4o");
        // Unspecified sections fall back to defaults
        assert_eq!(config.provider.ollama.host, "http://localhost:11434");
        assert_eq!(config.store.db_path, Some("/tmp/tasks.db".to_string()));
    }

    #[test]
    fn test_parse_empty_yaml_uses_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.provider.provider_type, "ollama");
        assert!(config.store.db_path.is_none());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.provider.provider_type, config.provider.provider_type);
        assert_eq!(parsed.provider.ollama.model, config.provider.ollama.model);
    }
}
