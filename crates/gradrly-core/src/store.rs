//! JSON-file persistence for the simulated directory and catalog.
//!
//! Each collection lives in one JSON file under the data directory, read at
//! startup and rewritten on every mutation. A file that fails to parse is
//! discarded and removed so the owning store reseeds its defaults, matching
//! how the original product drops unparseable local-storage entries.

use crate::errors::GradingError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, GradingError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            GradingError::StorageError(format!(
                "Failed to create data directory {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    /// Opens the store in the platform data directory.
    pub fn open_default() -> Result<Self, GradingError> {
        let dir = dirs::data_dir()
            .ok_or_else(|| {
                GradingError::StorageError("No platform data directory available".to_string())
            })?
            .join("gradrly");
        Self::new(dir)
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Loads a collection, returning `None` when the file is missing or
    /// does not parse. Corrupt files are removed.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let path = self.dir.join(name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(_) => return None,
        };

        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!(
                    "Discarding corrupt store file {}: {}",
                    path.display(),
                    e
                );
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    pub fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<(), GradingError> {
        let path = self.dir.join(name);
        let contents = serde_json::to_string_pretty(value).map_err(|e| {
            GradingError::StorageError(format!("Failed to serialize {}: {}", name, e))
        })?;
        fs::write(&path, contents).map_err(|e| {
            GradingError::StorageError(format!("Failed to write {}: {}", path.display(), e))
        })
    }

    pub fn remove(&self, name: &str) {
        let _ = fs::remove_file(self.dir.join(name));
    }
}
