//! Durable session storage.
//!
//! The session triple (token, user id, username) lives in a key-value store
//! behind the [`SessionStorage`] trait so the session store can run against
//! an in-memory map in tests and a JSON file in real deployments.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing::warn;

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "lacquer_token";
/// Storage key for the signed-in account id.
pub const USER_ID_KEY: &str = "lacquer_user_id";
/// Storage key for the signed-in display name.
pub const USERNAME_KEY: &str = "lacquer_username";

/// Durable storage failure.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt storage file: {0}")]
    Corrupt(String),
}

/// Key-value storage for session entries.
///
/// Implementations must tolerate concurrent access from multiple clones of
/// the session store. Only the session store itself writes through this
/// trait; everything else reads session state via its accessors.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage. Used by tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// File-backed storage: a flat JSON object of string entries.
///
/// Every operation reads and rewrites the whole file. The session triple is
/// three small strings, so this stays simple instead of fast.
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles between clones in one process.
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<HashMap<String, String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StorageError::Corrupt(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    /// Load for a read-modify-write cycle. A corrupt file must not wedge
    /// the session forever, so writes start from an empty map instead of
    /// failing; the flag tells `remove` to rewrite the file even when the
    /// key was absent.
    fn load_for_write(&self) -> Result<(HashMap<String, String>, bool), StorageError> {
        match self.load() {
            Ok(entries) => Ok((entries, false)),
            Err(StorageError::Corrupt(error)) => {
                warn!(%error, path = %self.path.display(), "session file corrupt, starting fresh");
                Ok((HashMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn store(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let (mut entries, _) = self.load_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let (mut entries, repaired) = self.load_for_write()?;
        if entries.remove(key).is_some() || repaired {
            self.store(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "tok123").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok123"));
        storage.remove(TOKEN_KEY).unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn memory_storage_missing_key_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("nope").unwrap(), None);
    }

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lacquer-storage-{}-{}.json", std::process::id(), name))
    }

    #[test]
    fn file_storage_round_trip() {
        let path = temp_file("roundtrip");
        let storage = FileStorage::new(&path);
        storage.set(USERNAME_KEY, "DemoUser").unwrap();
        storage.set(USER_ID_KEY, "u1").unwrap();

        // A fresh handle over the same path sees the same entries.
        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get(USERNAME_KEY).unwrap().as_deref(),
            Some("DemoUser")
        );
        reopened.remove(USERNAME_KEY).unwrap();
        assert_eq!(reopened.get(USERNAME_KEY).unwrap(), None);
        assert_eq!(reopened.get(USER_ID_KEY).unwrap().as_deref(), Some("u1"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn file_storage_missing_file_reads_empty() {
        let storage = FileStorage::new(temp_file("missing"));
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn corrupt_file_is_replaced_on_set() {
        let path = temp_file("corrupt-set");
        std::fs::write(&path, "{not json").unwrap();
        let storage = FileStorage::new(&path);

        // Reads still report the corruption, but writes recover from it.
        assert!(matches!(storage.get(TOKEN_KEY), Err(StorageError::Corrupt(_))));
        storage.set(TOKEN_KEY, "tok123").unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok123"));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn corrupt_file_is_repaired_on_remove() {
        let path = temp_file("corrupt-remove");
        std::fs::write(&path, "not even close").unwrap();
        let storage = FileStorage::new(&path);

        storage.remove(TOKEN_KEY).unwrap();
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USERNAME_KEY).unwrap(), None);

        std::fs::remove_file(&path).ok();
    }
}
