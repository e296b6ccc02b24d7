//! Editing session: one buffer with its history, catalog and find state
//!
//! Every discrete edit commits the buffer before and after mutating it, so a
//! single undo reverts exactly that edit. Typing goes through
//! [`Session::set_buffer`] and is only recorded on an explicit
//! [`Session::commit`] (driven by the debounced history tick).

use std::collections::BTreeMap;
use std::ops::Range;

use crate::config::EditorConfig;
use crate::error::EditError;
use crate::format::{self, DocumentStats, Format};
use crate::history::HistoryStore;
use crate::persistence::{KeyValueStore, Persistence, StorageError};
use crate::search::{self, Direction, FindState, Match, SearchOptions};
use crate::sections::{Catalog, SectionReport};
use crate::template::{self, Placeholders};
use crate::validation::{self, ValidationIssue};

/// Outcome of a find step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindResult {
    pub matched: Match,
    /// 1-based position of the match among all matches
    pub position: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct Session {
    buffer: String,
    history: HistoryStore,
    catalog: Catalog,
    placeholders: Placeholders,
    /// User-level placeholder defaults (from config)
    placeholder_defaults: BTreeMap<String, String>,
    search_options: SearchOptions,
    find: FindState,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            buffer: String::new(),
            history: HistoryStore::new(),
            catalog,
            placeholders: Placeholders::new(),
            placeholder_defaults: BTreeMap::new(),
            search_options: SearchOptions::default(),
            find: FindState::default(),
        }
    }

    pub fn from_config(catalog: Catalog, config: &EditorConfig) -> Self {
        Self {
            history: HistoryStore::with_max_size(config.history_limit),
            placeholder_defaults: config.placeholders.clone(),
            search_options: config.search,
            ..Self::new(catalog)
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    pub fn set_placeholders(&mut self, placeholders: Placeholders) {
        self.placeholders = placeholders;
    }

    /// Default find/replace flags from config
    pub fn search_options(&self) -> SearchOptions {
        self.search_options
    }

    pub fn find_state(&self) -> &FindState {
        &self.find
    }

    /// Replace the buffer with loaded content and record it
    pub fn load(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.find.clear();
        self.history.commit(&self.buffer);
    }

    /// Typing path: replace the buffer without recording history
    pub fn set_buffer(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.find.clear();
    }

    pub fn commit(&mut self) {
        self.history.commit(&self.buffer);
    }

    /// Revert to the previous recorded state.
    ///
    /// Uncommitted typing counts as one step: it is dropped and the buffer
    /// returns to the newest snapshot. A failed undo changes nothing.
    pub fn undo(&mut self) -> Result<(), EditError> {
        let pending = self
            .history
            .current()
            .filter(|top| *top != self.buffer)
            .map(str::to_string);
        self.buffer = match pending {
            Some(top) => top,
            None => self.history.undo()?,
        };
        self.find.clear();
        tracing::debug!(depth = self.history.len(), "session: undo");
        Ok(())
    }

    /// Record, mutate, record
    fn edit(&mut self, new_buffer: String) {
        self.history.commit(&self.buffer);
        self.buffer = new_buffer;
        self.history.commit(&self.buffer);
    }

    /// Apply a formatting command, returning the new cursor offset
    pub fn apply_format(&mut self, selection: Range<usize>, format: Format) -> usize {
        let edit = format::apply_format(&self.buffer, selection, format);
        self.find.clear();
        self.edit(edit.buffer);
        edit.cursor
    }

    /// Insert a catalog section, returning the offset where its text begins
    pub fn insert_section(&mut self, name: &str) -> Result<usize, EditError> {
        let placeholders = self
            .placeholders
            .clone()
            .layered_over(&self.placeholder_defaults);
        let insertion = template::insert(&self.catalog, &self.buffer, name, &placeholders)?;
        self.find.clear();
        self.edit(insertion.buffer);
        Ok(insertion.offset)
    }

    pub fn find(
        &mut self,
        query: &str,
        options: SearchOptions,
        direction: Direction,
    ) -> Result<FindResult, EditError> {
        let matched = self.find.find(&self.buffer, query, options, direction)?;
        let position = self.find.current.map_or(0, |i| i + 1);
        Ok(FindResult {
            matched,
            position,
            total: self.find.matches.len(),
        })
    }

    /// Replace the selected match; the selection stays on the same slot
    pub fn replace_current(&mut self, replacement: &str) -> Result<Option<Match>, EditError> {
        let new_buffer = self.find.replace_current(&self.buffer, replacement)?;
        self.edit(new_buffer);
        Ok(self.find.selected())
    }

    /// Replace the `n`th match of `query` (1-based, in document order).
    ///
    /// Returns `Ok(None)` and leaves the buffer alone when `n` is out of range.
    pub fn replace_nth(
        &mut self,
        query: &str,
        replacement: &str,
        options: SearchOptions,
        n: usize,
    ) -> Result<Option<FindResult>, EditError> {
        let total = self.find(query, options, Direction::Forward)?.total;
        let Some(matched) = n.checked_sub(1).and_then(|i| self.find.select(i)) else {
            return Ok(None);
        };
        self.replace_current(replacement)?;
        Ok(Some(FindResult {
            matched,
            position: n,
            total,
        }))
    }

    /// Replace every match of `query`, returning the replacement count
    pub fn replace_all(
        &mut self,
        query: &str,
        replacement: &str,
        options: SearchOptions,
    ) -> Result<usize, EditError> {
        let (new_buffer, count) = search::replace_all(&self.buffer, query, replacement, options)?;
        self.find.clear();
        self.edit(new_buffer);
        Ok(count)
    }

    /// Normalize the buffer; returns false when there was nothing to do
    pub fn prettify(&mut self) -> bool {
        match format::prettify(&self.buffer) {
            Some(pretty) if pretty != self.buffer => {
                self.find.clear();
                self.edit(pretty);
                true
            }
            _ => false,
        }
    }

    pub fn validate(&self) -> Vec<ValidationIssue> {
        validation::validate(&self.buffer)
    }

    pub fn analyze(&self) -> SectionReport {
        self.catalog.analyze(&self.buffer)
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats::of(&self.buffer)
    }

    /// Restore buffer and placeholders; returns whether content was found
    pub fn restore<S: KeyValueStore>(
        &mut self,
        persistence: &Persistence<S>,
    ) -> Result<bool, StorageError> {
        if let Some(placeholders) = persistence.load_placeholders()? {
            self.placeholders = placeholders;
        }

        match persistence.load_content()? {
            Some(content) => {
                tracing::info!(bytes = content.len(), "session: restored saved content");
                self.load(content);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn persist<S: KeyValueStore>(
        &self,
        persistence: &mut Persistence<S>,
    ) -> Result<(), StorageError> {
        persistence.save_content(&self.buffer)?;
        persistence.save_placeholders(&self.placeholders)
    }
}
