//! Core library for Gradrly, an AI-assisted academic grading toolkit.
//!
//! This crate provides the grading pipeline and its supporting infrastructure:
//!
//! - **Language model integration**: a provider-agnostic LLM interface with
//!   OpenAI-compatible HTTP clients
//! - **Grading pipeline**: prompt construction from an assignment and rubric,
//!   response decoding with clamping and defaults, and a deterministic
//!   fallback when the model call fails or returns malformed output
//! - **Rubric generation**: model-backed rubric drafting with a fixed default
//!   rubric as the fallback
//! - **Directory and catalog**: the simulated account/university/professor
//!   directory and the assignment/grade-history catalog, persisted as JSON
//!   files in the platform data directory
//! - **Configuration system**: YAML configuration with serde defaults

pub mod catalog;
pub mod config;
pub mod core_types;
pub mod directory;
pub mod errors;
pub mod grading;
pub mod llm;
pub mod store;

pub use config::GradrlyConfig;
pub use errors::GradingError;
pub use grading::GradingService;
pub use llm::LLM;

#[cfg(test)]
pub mod test_utils;
