use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Key under which the whole vote collection is persisted.
pub const STORAGE_KEY: &str = "electionApp";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage unavailable at {}: {source}", .path.display())]
    Unavailable { path: PathBuf, source: io::Error },

    #[error("Corrupt data in storage: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// String key-value storage medium, in the shape of a browser `localStorage`.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` if the key was never set.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove every key.
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// Process-local store, mostly useful in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        Ok(())
    }
}
