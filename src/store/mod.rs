//! Persistent key-value storage
//!
//! A string-to-string store that survives restarts. The progression engine
//! and the project library share one store through a [`StoreHandle`].

pub mod file;
pub mod memory;

use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};

pub use file::FileStore;
pub use memory::MemoryStore;

/// Default prefix for all keys written by CodeQuest
pub const DEFAULT_KEY_PREFIX: &str = "codequest";

/// Key-value persistence backend
pub trait KeyValueStore: Send {
    /// Read a key; `Ok(None)` when absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a key, durable before returning
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a key; deleting an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Fully-qualified storage keys for one key prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKeys {
    pub level: String,
    pub xp: String,
    pub projects: String,
}

impl StoreKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            level: format!("{}_level", prefix),
            xp: format!("{}_xp", prefix),
            projects: format!("{}_projects", prefix),
        }
    }
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

/// Cloneable shared access to one store
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<Mutex<Box<dyn KeyValueStore>>>,
}

impl StoreHandle {
    /// Wrap a store for sharing
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(store))),
        }
    }

    /// In-memory store, mostly for tests and ephemeral sessions
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let store = self.inner.lock().map_err(|_| Error::StorePoisoned)?;
        store.get(key)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut store = self.inner.lock().map_err(|_| Error::StorePoisoned)?;
        store.set(key, value)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let mut store = self.inner.lock().map_err(|_| Error::StorePoisoned)?;
        store.remove(key)
    }
}

impl std::fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreHandle").finish_non_exhaustive()
    }
}
