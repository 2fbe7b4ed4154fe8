//! File-backed store
//!
//! Keeps every key in one JSON object on disk. Writes go through
//! immediately: each `set`/`remove` rewrites the file via a temporary
//! sibling and a rename.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::{Error, Result};

/// Default store file name inside the data directory
pub const DEFAULT_STORE_FILE: &str = "store.json";

/// JSON-file key-value store
#[derive(Debug)]
pub struct FileStore {
    /// Path of the JSON file
    path: PathBuf,
    /// Cached contents
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`
    ///
    /// A missing file yields an empty store. A corrupt file is logged and
    /// treated as empty; it is replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| Error::StoreReadFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!(
                            "Store file {} is malformed ({}), starting empty",
                            path.display(),
                            e
                        );
                        BTreeMap::new()
                    }
                }
            }
        } else {
            BTreeMap::new()
        };

        debug!("Opened store {} with {} keys", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    /// Open the default store inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Result<Self> {
        Self::open(data_dir.join(DEFAULT_STORE_FILE))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let write_err = |e: std::io::Error| Error::StoreWriteFailed {
            path: self.path.clone(),
            reason: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}
