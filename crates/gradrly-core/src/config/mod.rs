//! Configuration module for the grading toolkit
//!
//! YAML configuration with serde defaults throughout: a minimal file (or no
//! file at all) yields a working setup, and every section can be overridden
//! independently.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;

use crate::errors::GradingError;
use std::path::Path;

/// Load a configuration from a YAML file
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<GradrlyConfig, GradingError> {
    ConfigLoader::from_file(path).await
}
