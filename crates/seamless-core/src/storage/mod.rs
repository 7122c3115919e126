//! Key-value persistence for the element store.

mod autosave;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use autosave::{
    AutoSaveManager,
    PlatformAutoSaveManager,
    PlatformStorage,
    create_autosave_manager,
    create_default_storage,
    DEFAULT_AUTOSAVE_DELAY_MS,
    STORAGE_KEY,
};
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Opaque string key-value store, in the shape of browser `localStorage`.
///
/// On native platforms implementations must be Send + Sync.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    fn keys(&self) -> StorageResult<Vec<String>>;
}

/// Opaque string key-value store (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Read a value; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    fn keys(&self) -> StorageResult<Vec<String>>;
}

/// Load and parse a JSON value, falling back to `default` when the key is
/// missing, unreadable or holds something that does not parse.
pub fn load_or_default<S, T>(storage: &S, key: &str, default: T) -> T
where
    S: Storage + ?Sized,
    T: DeserializeOwned,
{
    match storage.get(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Ignoring corrupt value under {key}: {e}");
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            log::warn!("Failed to read {key}: {e}");
            default
        }
    }
}

/// Serialize a value as JSON and store it under `key`.
pub fn save_value<S, T>(storage: &S, key: &str, value: &T) -> StorageResult<()>
where
    S: Storage + ?Sized,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_or_default_missing() {
        let storage = MemoryStorage::new();
        let value: Vec<u32> = load_or_default(&storage, "nope", vec![7]);
        assert_eq!(value, vec![7]);
    }

    #[test]
    fn test_load_or_default_corrupt() {
        let storage = MemoryStorage::new();
        storage.set("k", "{not json").unwrap();
        let value: Vec<u32> = load_or_default(&storage, "k", Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let storage = MemoryStorage::new();
        save_value(&storage, "k", &vec![1, 2, 3]).unwrap();
        let value: Vec<u32> = load_or_default(&storage, "k", Vec::new());
        assert_eq!(value, vec![1, 2, 3]);
    }
}
