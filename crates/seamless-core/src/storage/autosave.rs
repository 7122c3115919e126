//! Debounced auto-save of the element store.
//!
//! Every change restarts the delay; a save happens only once the delay has
//! passed with no further change. The host calls [`AutoSaveManager::maybe_save`]
//! from its event loop or a timer.

use crate::config::EditorConfig;
use crate::store::ElementStore;
use crate::storage::{Storage, StorageResult, load_or_default, save_value};
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Default quiet period before saving, in milliseconds.
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 2000;

/// Key the element list is stored under.
pub const STORAGE_KEY: &str = "seamless-design-elements";

/// Manages debounced persistence of the element store.
pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    key: String,
    delay: Duration,
    /// Time of the most recent unsaved change.
    changed_at: Option<Instant>,
    last_save: Option<Instant>,
}

impl<S: Storage> AutoSaveManager<S> {
    /// Create a manager saving under [`STORAGE_KEY`] with the default delay.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            key: STORAGE_KEY.to_string(),
            delay: Duration::from_millis(DEFAULT_AUTOSAVE_DELAY_MS),
            changed_at: None,
            last_save: None,
        }
    }

    /// Create a manager using the configured key and delay.
    pub fn from_config(storage: Arc<S>, config: &EditorConfig) -> Self {
        let mut manager = Self::new(storage).with_key(config.storage_key.clone());
        manager.set_delay(Duration::from_millis(config.autosave_delay_ms));
        manager
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Record a change at `now`, restarting the debounce.
    pub fn mark_dirty_at(&mut self, now: Instant) {
        self.changed_at = Some(now);
    }

    pub fn mark_dirty(&mut self) {
        self.mark_dirty_at(Instant::now());
    }

    pub fn is_dirty(&self) -> bool {
        self.changed_at.is_some()
    }

    pub fn last_save(&self) -> Option<Instant> {
        self.last_save
    }

    /// Whether the quiet period after the latest change has elapsed.
    pub fn should_save_at(&self, now: Instant) -> bool {
        match self.changed_at {
            Some(changed) => now.saturating_duration_since(changed) >= self.delay,
            None => false,
        }
    }

    pub fn should_save(&self) -> bool {
        self.should_save_at(Instant::now())
    }

    /// Save if the debounce has elapsed. Returns true if a save happened.
    pub fn maybe_save_at(&mut self, store: &ElementStore, now: Instant) -> StorageResult<bool> {
        if !self.should_save_at(now) {
            return Ok(false);
        }
        self.save_at(store, now)?;
        Ok(true)
    }

    pub fn maybe_save(&mut self, store: &ElementStore) -> StorageResult<bool> {
        self.maybe_save_at(store, Instant::now())
    }

    /// Save immediately. A failed save leaves the store marked dirty so the
    /// next attempt retries.
    pub fn save_at(&mut self, store: &ElementStore, now: Instant) -> StorageResult<()> {
        if let Err(e) = save_value(self.storage.as_ref(), &self.key, store) {
            log::error!("Failed to auto-save {}: {}", self.key, e);
            return Err(e);
        }
        log::info!("Auto-saved {} elements to {}", store.len(), self.key);
        self.last_save = Some(now);
        self.changed_at = None;
        Ok(())
    }

    pub fn save(&mut self, store: &ElementStore) -> StorageResult<()> {
        self.save_at(store, Instant::now())
    }

    /// Load the last saved store. Missing or corrupt data yields an empty
    /// store.
    pub fn restore(&mut self) -> ElementStore {
        let store: ElementStore =
            load_or_default(self.storage.as_ref(), &self.key, ElementStore::new());
        log::info!("Restored {} elements from {}", store.len(), self.key);
        self.changed_at = None;
        store
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Create a platform-appropriate storage backend.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_storage() -> StorageResult<Arc<crate::storage::FileStorage>> {
    Ok(Arc::new(crate::storage::FileStorage::default_location()?))
}

#[cfg(target_arch = "wasm32")]
pub fn create_default_storage() -> StorageResult<Arc<crate::storage::LocalStorage>> {
    Ok(Arc::new(crate::storage::LocalStorage::new()?))
}

/// Convenience type alias for platform-specific storage.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStorage = crate::storage::FileStorage;

#[cfg(target_arch = "wasm32")]
pub type PlatformStorage = crate::storage::LocalStorage;

/// Type alias for the auto-save manager with platform-specific storage.
pub type PlatformAutoSaveManager = AutoSaveManager<PlatformStorage>;

/// Convenience function to create an auto-save manager with default storage.
pub fn create_autosave_manager(
    config: &EditorConfig,
) -> StorageResult<PlatformAutoSaveManager> {
    let storage = create_default_storage()?;
    Ok(AutoSaveManager::from_config(storage, config))
}
