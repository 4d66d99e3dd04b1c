//! Key-value backing stores for per-user picker state
//!
//! Values are JSON strings. A missing key is a normal state and reads as
//! `Ok(None)`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Errors from a backing store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    Io(String),
    Serialize(String),
    /// No location is available for durable storage
    Unavailable,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Serialize(e) => write!(f, "Serialization error: {}", e),
            StoreError::Unavailable => write!(f, "No storage location available"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Durable per-user key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store, used by tests and as a fallback when no config directory exists
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
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
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store persisted as a single JSON object on disk
///
/// The whole file is rewritten on every `set`, so each write is atomic from
/// the caller's point of view.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`, starting empty if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        "Ignoring corrupt store at {}: {}",
                        path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io(format!("{}: {}", path.display(), e))),
        };

        tracing::debug!("Opened store at {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    /// Open the store in the user's config directory
    pub fn open_default() -> Result<Self, StoreError> {
        let path = crate::config_paths::store_file().ok_or(StoreError::Unavailable)?;
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("{}: {}", parent.display(), e)))?;
        }
        let contents = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, contents)
            .map_err(|e| StoreError::Io(format!("{}: {}", self.path.display(), e)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}
