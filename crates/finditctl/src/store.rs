//! JSON file store - host-side persistence for the record list
//!
//! One pretty-printed JSON file under the user data directory. A missing
//! file is an empty store; a file that no longer parses is surfaced as
//! corruption rather than silently wiped.

use std::path::PathBuf;

use anyhow::{Context, Result};
use findit_core::{Item, ItemStore, StoreError};

/// File-backed [`ItemStore`]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store under the platform data directory, e.g.
    /// `~/.local/share/findit/items.json`
    pub fn at_default_path() -> Result<Self> {
        let data_dir = dirs::data_dir()
            .context("Could not resolve a data directory")?
            .join("findit");
        Ok(Self::new(data_dir.join("items.json")))
    }
}

impl ItemStore for JsonFileStore {
    fn load_all(&self) -> Result<Vec<Item>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::Io(e)),
        };
        serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    fn save_all(&mut self, items: &[Item]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(items)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
