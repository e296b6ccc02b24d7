//! Editor configuration persistence
//!
//! Stores user preferences in `~/.config/markwright/config.yaml`

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::debounce::DebounceConfig;
use crate::history::MAX_HISTORY;
use crate::search::SearchOptions;

/// Default storage quota in bytes (5 MB, like browser local storage)
pub const DEFAULT_STORAGE_QUOTA: usize = 5 * 1024 * 1024;

/// Storage settings for the persisted buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage file; defaults to `~/.config/markwright/storage.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Maximum total bytes stored
    #[serde(default = "default_quota")]
    pub quota_bytes: usize,
}

fn default_quota() -> usize {
    DEFAULT_STORAGE_QUOTA
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: None,
            quota_bytes: default_quota(),
        }
    }
}

impl StorageConfig {
    pub fn resolved_path(&self) -> Option<PathBuf> {
        self.path
            .clone()
            .or_else(crate::config_paths::storage_file)
    }
}

/// Editor configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Undo snapshots kept
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Default find/replace flags
    #[serde(default)]
    pub search: SearchOptions,

    /// User-level placeholder values, layered over the built-in defaults
    #[serde(default)]
    pub placeholders: BTreeMap<String, String>,

    /// Custom section catalog file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub debounce: DebounceConfig,
}

fn default_history_limit() -> usize {
    MAX_HISTORY
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            search: SearchOptions::default(),
            placeholders: BTreeMap::new(),
            catalog: None,
            storage: StorageConfig::default(),
            debounce: DebounceConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load config from a specific file, or return defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to a specific file
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// The catalog file to use instead of the built-in one, if any
    ///
    /// An explicit `catalog` setting wins; otherwise `sections.yaml` in the
    /// config directory is used when present.
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog.clone().or_else(|| {
            crate::config_paths::catalog_file().filter(|path| path.exists())
        })
    }
}
