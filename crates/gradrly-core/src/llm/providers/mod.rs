//! LLM provider implementations
//!
//! Provider-specific clients behind the common LLM trait. Every supported
//! provider speaks the OpenAI chat-completion protocol; Gemini and custom
//! deployments differ only in base URL and authentication source.

use crate::config::{LlmConfig, LlmProvider};
use crate::errors::GradingError;
use crate::llm::LLM;
use std::sync::Arc;

pub mod openai;

/// Create an LLM client based on the provider configuration
pub fn create_llm_client(config: &LlmConfig) -> Result<Arc<dyn LLM>, GradingError> {
    match &config.provider {
        LlmProvider::OpenAI => openai::create_client(config),
        LlmProvider::Gemini => openai::create_gemini_client(config),
        LlmProvider::Custom { base_url } => openai::create_custom_client(config, base_url),
    }
}

/// Get the default model for a provider if none is specified
pub fn get_default_model(provider: &LlmProvider) -> &'static str {
    match provider {
        LlmProvider::OpenAI => "gpt-4",
        LlmProvider::Gemini => "gemini-2.0-flash",
        LlmProvider::Custom { .. } => "gpt-4",
    }
}

/// Validate provider-specific configuration
pub fn validate_provider_config(config: &LlmConfig) -> Result<(), GradingError> {
    match &config.provider {
        LlmProvider::Custom { base_url } => {
            if base_url.is_empty() {
                return Err(GradingError::ConfigError(
                    "Custom provider requires a valid 'base_url'".to_string(),
                ));
            }
        }
        LlmProvider::OpenAI | LlmProvider::Gemini => {
            if config.auth.api_key.is_none() && config.auth.api_key_env.is_none() {
                return Err(GradingError::ConfigError(format!(
                    "{:?} provider requires either 'api_key' or 'api_key_env'",
                    config.provider
                )));
            }
        }
    }

    Ok(())
}
