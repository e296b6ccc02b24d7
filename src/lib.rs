//! Markwright - editing core for structured Markdown documents
//!
//! This crate provides snapshot undo history, literal find/replace, a catalog
//! of canonical README sections with template insertion, and a line-oriented
//! structural linter. A [`Session`] ties them together around one buffer.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod debounce;
pub mod error;
pub mod format;
pub mod history;
pub mod persistence;
pub mod render;
pub mod search;
pub mod sections;
pub mod session;
pub mod template;
pub mod tracing;
pub mod util;
pub mod validation;

// Re-export commonly used types
pub use config::EditorConfig;
pub use error::EditError;
pub use history::HistoryStore;
pub use search::{Direction, Match, SearchOptions};
pub use sections::{Catalog, SectionReport};
pub use session::{FindResult, Session};
pub use template::Placeholders;
pub use validation::{IssueKind, ValidationIssue};
