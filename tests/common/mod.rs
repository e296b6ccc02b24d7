//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use markwright::sections::Catalog;
use markwright::Session;

/// The bundled catalog
pub fn catalog() -> Catalog {
    Catalog::builtin().expect("built-in catalog parses")
}

/// Session loaded with `text` (one history entry)
pub fn test_session(text: &str) -> Session {
    let mut session = Session::new(catalog());
    session.load(text);
    session
}

/// A short README with a title, description and license
pub const SMALL_README: &str = "# Demo\n\n## Description\n\nA demo project.\n\n## License\n\nMIT\n";

/// A README with structural problems on known lines
pub const BROKEN_README: &str = "#Title\n\
\n\
-item\n\
1.first\n\
>quote\n\
- [x]done\n\
\tindented\n\
trailing   \n\
[link]()\n";

/// Byte offsets of every occurrence of `needle` (for cross-checking matches)
pub fn naive_offsets(haystack: &str, needle: &str) -> Vec<usize> {
    haystack.match_indices(needle).map(|(i, _)| i).collect()
}
