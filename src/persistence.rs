//! Key-value persistence for the buffer and template variables
//!
//! The in-memory buffer is always authoritative. A failed write, including a
//! quota overflow, is reported to the caller as a warning and never touches
//! the editing session.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

use crate::template::Placeholders;

/// Key holding the buffer text
pub const CONTENT_KEY: &str = "markdown-content";
/// Key holding the last-saved timestamp (epoch milliseconds)
pub const TIMESTAMP_KEY: &str = "markdown-timestamp";
/// Key holding the serialized placeholder map
pub const PLACEHOLDERS_KEY: &str = "templateVariables";

/// Errors from a key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded writing '{key}' ({needed} bytes needed, quota {quota})")]
    QuotaExceeded {
        key: String,
        needed: usize,
        quota: usize,
    },

    #[error("storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

/// Minimal string key-value store
pub trait KeyValueStore {
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Bytes used by all entries if `key` were set to `value`
fn usage_after_set(entries: &BTreeMap<String, String>, key: &str, value: &str) -> usize {
    entries
        .iter()
        .filter(|(k, _)| k.as_str() != key)
        .map(|(k, v)| k.len() + v.len())
        .sum::<usize>()
        + key.len()
        + value.len()
}

fn check_quota(
    entries: &BTreeMap<String, String>,
    quota: Option<usize>,
    key: &str,
    value: &str,
) -> Result<(), StorageError> {
    let Some(quota) = quota else {
        return Ok(());
    };

    let needed = usage_after_set(entries, key, value);
    if needed > quota {
        return Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            needed,
            quota,
        });
    }
    Ok(())
}

/// In-memory store with an optional byte quota
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            quota: Some(quota),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        check_quota(&self.entries, self.quota, key, value)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// JSON-file-backed store; every write is flushed to disk
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl Into<PathBuf>, quota: Option<usize>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!("Opened storage at {} ({} keys)", path.display(), entries.len());
        Ok(Self {
            path,
            entries,
            quota,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for FileStore {
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        check_quota(&self.entries, self.quota, key, value)?;
        let previous = self.entries.insert(key.to_string(), value.to_string());

        if let Err(e) = self.flush() {
            // Keep memory and disk in agreement
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Buffer and placeholder persistence over a key-value store
#[derive(Debug)]
pub struct Persistence<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Save the buffer and stamp the save time
    /// Store content and its timestamp as one unit.
    ///
    /// When the timestamp write fails the previous content is put back, so
    /// a failed save leaves both keys as they were.
    pub fn save_content(&mut self, content: &str) -> Result<(), StorageError> {
        let previous = self.store.get(CONTENT_KEY)?;
        let result = self.store.set(CONTENT_KEY, content).and_then(|()| {
            let now = Utc::now().timestamp_millis().to_string();
            self.store.set(TIMESTAMP_KEY, &now).inspect_err(|_| {
                let rollback = match &previous {
                    Some(old) => self.store.set(CONTENT_KEY, old),
                    None => self.store.remove(CONTENT_KEY),
                };
                if let Err(e) = rollback {
                    tracing::error!("Failed to roll back content after a failed save: {}", e);
                }
            })
        });

        match &result {
            Ok(()) => tracing::debug!(bytes = content.len(), "persistence: saved content"),
            Err(e) if e.is_quota_exceeded() => {
                tracing::warn!("Storage quota exceeded. Your content may not be saved.")
            }
            Err(e) => tracing::warn!("Failed to save content: {}", e),
        }
        result
    }

    pub fn load_content(&self) -> Result<Option<String>, StorageError> {
        let content = self.store.get(CONTENT_KEY)?;
        Ok(content.filter(|c| !c.is_empty()))
    }

    /// When the buffer was last saved
    pub fn last_saved(&self) -> Result<Option<DateTime<Utc>>, StorageError> {
        let Some(raw) = self.store.get(TIMESTAMP_KEY)? else {
            return Ok(None);
        };
        Ok(raw
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()))
    }

    pub fn clear_content(&mut self) -> Result<(), StorageError> {
        self.store.remove(CONTENT_KEY)?;
        self.store.remove(TIMESTAMP_KEY)
    }

    pub fn save_placeholders(&mut self, placeholders: &Placeholders) -> Result<(), StorageError> {
        let json = serde_json::to_string(placeholders)?;
        self.store.set(PLACEHOLDERS_KEY, &json)
    }

    /// Restore saved placeholder values; a corrupt snapshot is ignored
    pub fn load_placeholders(&self) -> Result<Option<Placeholders>, StorageError> {
        let Some(json) = self.store.get(PLACEHOLDERS_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(placeholders) => Ok(Some(placeholders)),
            Err(e) => {
                tracing::warn!("Error loading template variables: {}", e);
                Ok(None)
            }
        }
    }
}
