//! Configuration type definitions
//!
//! The configuration follows a layered approach where every field carries a
//! serde default, so a minimal YAML file (or none) produces a usable setup.

use crate::errors::GradingError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GradrlyConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub grading: GradingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub provider: LlmProvider,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub parameters: ModelParameters,
    #[serde(default)]
    pub auth: LlmAuth,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: default_model(),
            parameters: ModelParameters::default(),
            auth: LlmAuth::default(),
        }
    }
}

/// LLM provider types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAI,
    Gemini,
    Custom {
        base_url: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParameters {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmAuth {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,
}

impl Default for LlmAuth {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: default_api_key_env(),
        }
    }
}

/// Grading-specific overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GradingConfig {
    /// Replaces the built-in grader system instruction when set.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Local JSON-store settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Defaults to `<platform data dir>/gradrly` when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_temperature() -> f32 {
    // Low temperature for repeatable grading
    0.3
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_api_key_env() -> Option<String> {
    Some("OPENAI_API_KEY".to_string())
}

fn default_log_level() -> String {
    "info".to_string()
}

impl GradrlyConfig {
    /// Validates the configuration, returning hard errors for unusable
    /// values. Advisory issues are logged, not rejected.
    pub fn validate(&self) -> Result<(), GradingError> {
        if self.llm.model.trim().is_empty() {
            return Err(GradingError::ConfigError(
                "llm.model must not be empty".to_string(),
            ));
        }

        if let LlmProvider::Custom { base_url } = &self.llm.provider {
            if base_url.trim().is_empty() {
                return Err(GradingError::ConfigError(
                    "Custom provider requires a non-empty 'base_url'".to_string(),
                ));
            }
        }

        if !(0.0..=2.0).contains(&self.llm.parameters.temperature) {
            log::warn!(
                "Unusual temperature {} (expected 0.0..=2.0)",
                self.llm.parameters.temperature
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GradrlyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.llm.model, "gpt-4");
        assert_eq!(config.llm.parameters.temperature, 0.3);
        assert_eq!(config.llm.parameters.max_tokens, 2000);
        assert_eq!(config.llm.auth.api_key_env.as_deref(), Some("OPENAI_API_KEY"));
    }

    #[test]
    fn test_validate_rejects_empty_model() {
        let mut config = GradrlyConfig::default();
        config.llm.model = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_custom_base_url() {
        let mut config = GradrlyConfig::default();
        config.llm.provider = LlmProvider::Custom {
            base_url: String::new(),
        };
        assert!(config.validate().is_err());
    }
}
