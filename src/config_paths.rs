//! Where markwright keeps its per-user files
//!
//! Everything lives in one directory:
//! - Unix/macOS: `$XDG_CONFIG_HOME/markwright/` or `~/.config/markwright/`
//! - Windows: `%APPDATA%\markwright\`

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "markwright";

/// Entries of the config directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserPath {
    /// `config.yaml`, the editor config
    Config,
    /// `sections.yaml`, an optional user section catalog
    Catalog,
    /// `storage.json`, the persisted draft and placeholders
    Storage,
    /// `logs/`, daily-rotated log files
    Logs,
}

impl UserPath {
    pub const ALL: [UserPath; 4] = [
        UserPath::Config,
        UserPath::Catalog,
        UserPath::Storage,
        UserPath::Logs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UserPath::Config => "config.yaml",
            UserPath::Catalog => "sections.yaml",
            UserPath::Storage => "storage.json",
            UserPath::Logs => "logs",
        }
    }

    pub fn resolve(self) -> Option<PathBuf> {
        config_dir().map(|dir| dir.join(self.name()))
    }
}

/// Base config directory, or `None` when no home can be determined
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

pub fn config_file() -> Option<PathBuf> {
    UserPath::Config.resolve()
}

pub fn catalog_file() -> Option<PathBuf> {
    UserPath::Catalog.resolve()
}

pub fn storage_file() -> Option<PathBuf> {
    UserPath::Storage.resolve()
}

pub fn logs_dir() -> Option<PathBuf> {
    UserPath::Logs.resolve()
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Create the logs directory (and the config directory above it)
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let logs = logs_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&logs)?;
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_paths_have_distinct_names() {
        let mut names: Vec<_> = UserPath::ALL.iter().map(|p| p.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), UserPath::ALL.len());
    }

    #[test]
    fn test_logs_dir_is_the_logs_entry() {
        assert_eq!(logs_dir(), config_dir().map(|dir| dir.join("logs")));
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join(APP_DIR).join(UserPath::Logs.name());
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
        // Existing directory is fine
        ensure_dir(&nested).unwrap();
    }
}
