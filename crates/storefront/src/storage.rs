//! Durable key-value storage.
//!
//! The storefront persists three things between sessions: the cart, the
//! auth token, and the cached user profile. All three go through the
//! [`KeyValueStorage`] contract (`get`/`set`/`remove` on string keys), so
//! the mechanism can be swapped without touching the stores that use it.
//!
//! Two implementations are provided:
//! - [`MemoryStorage`] - ephemeral, for tests and throwaway sessions
//! - [`JsonFileStorage`] - a single JSON object file, flushed on every
//!   write (the desktop analog of browser local storage)
//!
//! Persistence failures are deliberately non-fatal: a failed flush is
//! logged and the in-memory state stays authoritative for the rest of the
//! session. Concurrent writers (two processes on one data file) are not
//! coordinated - last writer wins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::{error, warn};

/// Storage key for the persisted cart state.
pub const CART_KEY: &str = "fastrac-cart";
/// Storage key for the auth bearer token.
pub const AUTH_TOKEN_KEY: &str = "fastrac-auth-token";
/// Storage key for the cached user profile.
pub const USER_KEY: &str = "fastrac-user";

/// Errors that can occur when opening a storage file.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The storage directory could not be created.
    #[error("failed to create storage directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage file exists but could not be read.
    #[error("failed to read storage file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Durable string key-value storage.
///
/// Implementations use interior mutability so stores can share a handle
/// (`Arc<dyn KeyValueStorage>`) without threading `&mut` through every
/// caller. `get` never writes.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value for `key`, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str);

    /// Delete `key` if present (no-op otherwise).
    fn remove(&self, key: &str);
}

// =============================================================================
// MemoryStorage
// =============================================================================

/// In-memory storage with no durability.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.entries.lock() {
            map.insert(key.to_owned(), value.to_owned());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.entries.lock() {
            map.remove(key);
        }
    }
}

// =============================================================================
// JsonFileStorage
// =============================================================================

/// File-backed storage: one JSON object mapping keys to string values.
///
/// The file is read once when the store is opened and rewritten in full on
/// every `set`/`remove`. A corrupt file degrades to an empty store with a
/// warning rather than an error, matching the rehydration semantics of the
/// stores built on top of it.
pub struct JsonFileStorage {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStorage {
    /// File name used inside the data directory.
    const FILE_NAME: &'static str = "storage.json";

    /// Open (or create) the storage file inside `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created or the
    /// existing file cannot be read. Unparseable contents are not an
    /// error - the store starts empty and logs a warning.
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(data_dir).map_err(|source| StorageError::CreateDir {
            path: data_dir.to_path_buf(),
            source,
        })?;

        let path = data_dir.join(Self::FILE_NAME);
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "storage file is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::ReadFile { path, source }),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, map: &BTreeMap<String, String>) {
        let json = match serde_json::to_string_pretty(map) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "failed to serialize storage contents");
                return;
            }
        };

        // Write through a sibling temp file so a crash mid-write cannot
        // truncate the previous contents.
        let tmp = self.path.with_extension("json.tmp");
        let result = std::fs::write(&tmp, json).and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(e) = result {
            error!(path = %self.path.display(), error = %e, "failed to flush storage file");
        }
    }
}

impl KeyValueStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|map| map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.entries.lock() {
            map.insert(key.to_owned(), value.to_owned());
            self.flush(&map);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.entries.lock() {
            if map.remove(key).is_some() {
                self.flush(&map);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k"), None);

        storage.set("k", "v");
        assert_eq!(storage.get("k"), Some("v".to_owned()));

        storage.set("k", "v2");
        assert_eq!(storage.get("k"), Some("v2".to_owned()));

        storage.remove("k");
        assert_eq!(storage.get("k"), None);
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let storage = MemoryStorage::new();
        storage.remove("missing");
        assert_eq!(storage.get("missing"), None);
    }

    #[test]
    fn test_file_storage_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();

        {
            let storage = JsonFileStorage::open(dir.path()).unwrap();
            storage.set(CART_KEY, r#"{"lines":[]}"#);
            storage.set(AUTH_TOKEN_KEY, "tok");
        }

        let reopened = JsonFileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get(CART_KEY), Some(r#"{"lines":[]}"#.to_owned()));
        assert_eq!(reopened.get(AUTH_TOKEN_KEY), Some("tok".to_owned()));
        assert_eq!(reopened.get(USER_KEY), None);
    }

    #[test]
    fn test_file_storage_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("storage.json"), "not json {").unwrap();

        let storage = JsonFileStorage::open(dir.path()).unwrap();
        assert_eq!(storage.get(CART_KEY), None);

        // And it recovers on the next write
        storage.set("k", "v");
        let reopened = JsonFileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get("k"), Some("v".to_owned()));
    }

    #[test]
    fn test_file_storage_remove_persists() {
        let dir = tempfile::tempdir().unwrap();

        let storage = JsonFileStorage::open(dir.path()).unwrap();
        storage.set("a", "1");
        storage.set("b", "2");
        storage.remove("a");

        let reopened = JsonFileStorage::open(dir.path()).unwrap();
        assert_eq!(reopened.get("a"), None);
        assert_eq!(reopened.get("b"), Some("2".to_owned()));
    }
}
