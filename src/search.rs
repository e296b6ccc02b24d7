//! Literal find/replace over a buffer
//!
//! Queries are always literal text: metacharacters are escaped before a
//! pattern is built, and whole-word matching is opt-in. Matches are
//! left-to-right and non-overlapping; offsets are byte offsets.

use regex::{NoExpand, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::EditError;

/// Search flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Case-sensitive search
    #[serde(default)]
    pub case_sensitive: bool,
    /// Only match at word boundaries on both sides
    #[serde(default)]
    pub whole_word: bool,
}

impl SearchOptions {
    pub fn case_sensitive() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
        }
    }
}

/// One occurrence of a query in the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Byte offset of the first matched byte
    pub offset: usize,
    /// Length of the matched text in bytes (always > 0)
    pub length: usize,
}

impl Match {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Direction for stepping through matches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Compile a literal query into a pattern.
pub fn compile_pattern(query: &str, options: SearchOptions) -> Result<Regex, EditError> {
    if query.is_empty() {
        return Err(EditError::EmptyQuery);
    }

    let mut pattern = regex::escape(query);
    if options.whole_word {
        pattern = format!(r"\b{}\b", pattern);
    }

    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .build()?;
    Ok(regex)
}

/// Find every non-overlapping occurrence of `query` in `buffer`.
pub fn search(buffer: &str, query: &str, options: SearchOptions) -> Result<Vec<Match>, EditError> {
    let regex = compile_pattern(query, options)?;
    let matches: Vec<Match> = regex
        .find_iter(buffer)
        .map(|m| Match {
            offset: m.start(),
            length: m.len(),
        })
        .collect();

    tracing::debug!(count = matches.len(), "search: computed matches");
    Ok(matches)
}

/// Step to the next match index with wraparound.
///
/// `current` is `None` when no match is selected yet.
pub fn advance(
    matches: &[Match],
    current: Option<usize>,
    direction: Direction,
) -> Result<usize, EditError> {
    let len = matches.len();
    if len == 0 {
        return Err(EditError::NoMatches);
    }

    let next = match (direction, current) {
        (Direction::Forward, None) => 0,
        (Direction::Forward, Some(i)) => (i + 1) % len,
        (Direction::Backward, Some(i)) if i > 0 => (i - 1).min(len - 1),
        (Direction::Backward, _) => len - 1,
    };
    Ok(next)
}

/// 1-based line and character column of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

/// Locate each match in one forward walk over the buffer.
///
/// `matches` must be sorted by offset, as [`search`] returns them.
pub fn locate(buffer: &str, matches: &[Match]) -> Vec<Location> {
    let mut locations = Vec::with_capacity(matches.len());
    let mut pos = 0;
    let mut line = 1;
    let mut column = 1;

    for m in matches {
        let Some(segment) = buffer.get(pos..m.offset) else {
            break;
        };
        for c in segment.chars() {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        pos = m.offset;
        locations.push(Location { line, column });
    }
    locations
}

/// Replace the text spanned by `matches[index]` and return the new buffer.
///
/// The entry at `index` is removed from `matches` and every later entry is
/// shifted by the length difference. Earlier entries are untouched.
pub fn replace_one(
    buffer: &str,
    matches: &mut Vec<Match>,
    index: usize,
    replacement: &str,
) -> Result<String, EditError> {
    let target = *matches.get(index).ok_or(EditError::NoMatchSelected)?;
    let span = buffer
        .get(target.offset..target.end())
        .ok_or(EditError::NoMatchSelected)?;

    let mut result = String::with_capacity(buffer.len() - span.len() + replacement.len());
    result.push_str(&buffer[..target.offset]);
    result.push_str(replacement);
    result.push_str(&buffer[target.end()..]);

    matches.remove(index);
    for later in matches.iter_mut().skip(index) {
        // later.offset >= target.end(), so this never underflows
        later.offset = later.offset - target.length + replacement.len();
    }

    tracing::debug!(
        offset = target.offset,
        remaining = matches.len(),
        "search: replaced one match"
    );
    Ok(result)
}

/// Replace every occurrence in one pass, returning the new buffer and count.
pub fn replace_all(
    buffer: &str,
    query: &str,
    replacement: &str,
    options: SearchOptions,
) -> Result<(String, usize), EditError> {
    let regex = compile_pattern(query, options)?;
    let count = regex.find_iter(buffer).count();
    if count == 0 {
        return Err(EditError::NoMatches);
    }

    let result = regex.replace_all(buffer, NoExpand(replacement)).into_owned();
    tracing::debug!(count, "search: replaced all matches");
    Ok((result, count))
}

/// Match list paired with the buffer it was computed from.
///
/// Holds the find/replace state of one session: the last query, its matches
/// and the selected index.
#[derive(Debug, Clone, Default)]
pub struct FindState {
    pub query: String,
    pub options: SearchOptions,
    pub matches: Vec<Match>,
    pub current: Option<usize>,
}

impl FindState {
    /// Recompute matches from scratch and step in `direction`.
    pub fn find(
        &mut self,
        buffer: &str,
        query: &str,
        options: SearchOptions,
        direction: Direction,
    ) -> Result<Match, EditError> {
        if query.is_empty() {
            return Err(EditError::EmptyQuery);
        }

        // Keep the selected slot across repeated finds of the same query
        let previous = if self.query == query && self.options == options {
            self.current
        } else {
            None
        };

        self.query = query.to_string();
        self.options = options;
        self.matches = search(buffer, query, options)?;
        self.current = None;

        let index = advance(&self.matches, previous, direction)?;
        self.current = Some(index);
        Ok(self.matches[index])
    }

    /// Replace the selected match, keeping the index on the same slot.
    pub fn replace_current(&mut self, buffer: &str, replacement: &str) -> Result<String, EditError> {
        let index = self
            .current
            .filter(|&i| i < self.matches.len())
            .ok_or(EditError::NoMatchSelected)?;

        let result = replace_one(buffer, &mut self.matches, index, replacement)?;

        self.current = if self.matches.is_empty() {
            None
        } else if index >= self.matches.len() {
            Some(0)
        } else {
            Some(index)
        };
        Ok(result)
    }

    /// Select the match at `index` in document order
    pub fn select(&mut self, index: usize) -> Option<Match> {
        let matched = self.matches.get(index).copied()?;
        self.current = Some(index);
        Some(matched)
    }

    /// Currently selected match
    pub fn selected(&self) -> Option<Match> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }

    /// Drop matches; they no longer describe the buffer
    pub fn clear(&mut self) {
        self.matches.clear();
        self.current = None;
    }
}
