//! Configuration loader for YAML files

use crate::config::types::GradrlyConfig;
use crate::errors::GradingError;
use std::path::Path;
use tokio::fs;

/// Configuration loader with validation
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<GradrlyConfig, GradingError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).await.map_err(|e| {
            GradingError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_str(&content)
    }

    /// Load configuration from a YAML file, falling back to defaults when
    /// the file does not exist.
    pub async fn from_file_or_default<P: AsRef<Path>>(
        path: P,
    ) -> Result<GradrlyConfig, GradingError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!(
                "No config file at {}, using built-in defaults",
                path.display()
            );
            return Ok(GradrlyConfig::default());
        }

        Self::from_file(path).await
    }

    /// Load configuration from a YAML string
    pub fn from_str(content: &str) -> Result<GradrlyConfig, GradingError> {
        let config: GradrlyConfig = serde_yaml::from_str(content)
            .map_err(|e| GradingError::ConfigError(format!("Failed to parse YAML config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }
}
