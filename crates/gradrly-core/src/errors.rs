//! Error types for failure handling across the grading toolkit
//!
//! A single error hierarchy categorized by subsystem (LLM, parsing,
//! configuration, storage). The grading service itself never surfaces
//! `LLMError` or `ParsingError` to its callers: both are converted into the
//! static fallback result so a grade request always yields a well-formed
//! response. The variants exist so that the substitution can be logged with
//! its cause and so other call sites can propagate failures normally.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GradingError {
    #[error("LLM interaction failed: {0}")]
    LLMError(String),
    #[error("Parsing error: {0}")]
    ParsingError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("I/O error: {0}")]
    IoError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<std::io::Error> for GradingError {
    fn from(err: std::io::Error) -> Self {
        GradingError::IoError(err.to_string())
    }
}

impl From<reqwest::Error> for GradingError {
    fn from(err: reqwest::Error) -> Self {
        GradingError::LLMError(err.to_string())
    }
}
