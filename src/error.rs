//! Error types for the editing core
//!
//! Every mutating operation either returns a complete new buffer or one of
//! these errors; a failed operation never leaves a half-edited buffer behind.

use thiserror::Error;

/// Errors signaled by the history, search, and template services
#[derive(Debug, Error)]
pub enum EditError {
    /// Search or replace was invoked with an empty query
    #[error("enter text to find")]
    EmptyQuery,

    /// A well-formed search or replace-all found zero occurrences
    #[error("no matches found")]
    NoMatches,

    /// Replace-current was invoked without a selected match
    #[error("no match selected")]
    NoMatchSelected,

    /// History holds fewer than two snapshots
    #[error("nothing to undo")]
    NothingToUndo,

    /// The section is already structurally present in the document
    #[error("section '{section}' already exists in the document")]
    SectionAlreadyPresent { section: String },

    /// The section name is not part of the catalog
    #[error("unknown section '{section}'")]
    UnknownSection { section: String },

    /// The escaped query could not be compiled (size limits)
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

impl EditError {
    /// Whether callers should surface this as a notice rather than a failure
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            Self::SectionAlreadyPresent { .. } | Self::NothingToUndo
        )
    }
}
