//! Persisted client state behind a small key-value interface.
//!
//! Values are JSON documents under string keys, mirroring browser local
//! storage. Two implementations exist:
//!
//! - [`MemoryStore`] - process-local, used by tests and ephemeral sessions
//! - [`JsonFileStore`] - one JSON object on disk, rewritten atomically on
//!   every change
//!
//! | Key | Value |
//! |-----|-------|
//! | `player:volume` | number in `[0, 1]` |
//! | `downloads:list` | [`DownloadRecord`] array, most recent first |
//! | `user:playlists` | [`Playlist`] array |

pub mod downloads;
pub mod playlists;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

pub use downloads::{DOWNLOADS_KEY, DownloadHistory, DownloadRecord, MAX_DOWNLOADS};
pub use playlists::{PLAYLISTS_KEY, Playlist, Playlists};

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read store {0}: {1}")]
    Read(PathBuf, std::io::Error),

    #[error("Failed to write store {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Store file {0} is not a JSON object: {1}")]
    Corrupt(PathBuf, String),

    #[error("Failed to serialize value for {key}: {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },

    #[error("Invalid value: {0}")]
    Invalid(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// String-keyed JSON value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read `key` as `T`. A value of the wrong shape reads as absent.
pub fn read_typed<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(value) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_value(value) {
        Ok(typed) => Ok(Some(typed)),
        Err(e) => {
            tracing::warn!("Ignoring malformed value under {}: {}", key, e);
            Ok(None)
        }
    }
}

/// Serialize `value` and store it under `key`.
pub fn write_typed<T: serde::Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, value)
}

/// Default store file: `<data_dir>/tunebridge/store.json`.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("tunebridge").join("store.json"))
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.values.write().remove(key);
        Ok(())
    }
}

// ============================================================================
// JSON file store
// ============================================================================

/// Store persisted as a single JSON object file.
///
/// The whole map is held in memory; each change rewrites the file through
/// a temp file and rename so a crash never leaves it half-written.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<Map<String, Value>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = if path.exists() {
            let contents =
                std::fs::read_to_string(&path).map_err(|e| StoreError::Read(path.clone(), e))?;
            if contents.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&contents) {
                    Ok(Value::Object(map)) => map,
                    Ok(_) => {
                        return Err(StoreError::Corrupt(path, "top level is not an object".into()));
                    }
                    Err(e) => return Err(StoreError::Corrupt(path, e.to_string())),
                }
            }
        } else {
            Map::new()
        };

        tracing::debug!("Opened store {:?} with {} keys", path, values.len());
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| StoreError::Write(dir.to_path_buf(), e))?;
        }

        let contents = serde_json::to_string_pretty(values).map_err(|source| {
            StoreError::Serialize {
                key: "*".to_string(),
                source,
            }
        })?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, contents).map_err(|e| StoreError::Write(temp_path.clone(), e))?;
        std::fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::Write(self.path.clone(), e))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.write();
        values.insert(key.to_string(), value);
        self.persist(&values)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.write();
        if values.remove(key).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}
