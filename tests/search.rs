//! Find/replace tests
//!
//! Queries are literal; offsets are byte offsets into the buffer.

mod common;

use common::{naive_offsets, test_session};
use markwright::search::{advance, locate, replace_all, replace_one, search, FindState, Location};
use markwright::{Direction, EditError, Match, SearchOptions};

fn offsets(matches: &[Match]) -> Vec<usize> {
    matches.iter().map(|m| m.offset).collect()
}

// ========================================================================
// search
// ========================================================================

#[test]
fn test_case_insensitive_offsets() {
    let matches = search("Foo bar foo FOO", "foo", SearchOptions::default()).unwrap();
    assert_eq!(offsets(&matches), vec![0, 8, 12]);
    assert!(matches.iter().all(|m| m.length == 3));
}

#[test]
fn test_matches_strictly_increasing_and_disjoint() {
    let buffer = "aaaa aaaaa a aa".repeat(20);
    let matches = search(&buffer, "aa", SearchOptions::case_sensitive()).unwrap();

    for pair in matches.windows(2) {
        assert!(pair[0].end() <= pair[1].offset);
    }
    assert_eq!(offsets(&matches), naive_offsets(&buffer, "aa"));
}

#[test]
fn test_metacharacters_are_literal() {
    let buffer = "cost: $5.00 (approx.) [a-z]* ^x|y";
    for query in ["$5.00", "(approx.)", "[a-z]*", "^x|y", "."] {
        let matches = search(buffer, query, SearchOptions::case_sensitive()).unwrap();
        assert_eq!(offsets(&matches), naive_offsets(buffer, query), "query {query:?}");
    }
}

#[test]
fn test_whole_word() {
    let options = SearchOptions {
        case_sensitive: false,
        whole_word: true,
    };
    let matches = search("cat concat cat. Cat", "cat", options).unwrap();
    assert_eq!(offsets(&matches), vec![0, 11, 16]);
}

#[test]
fn test_multibyte_offsets_are_bytes() {
    let matches = search("née née", "née", SearchOptions::case_sensitive()).unwrap();
    assert_eq!(offsets(&matches), vec![0, 5]);
    assert_eq!(matches[0].length, 4);
}

#[test]
fn test_empty_query() {
    assert!(matches!(
        search("text", "", SearchOptions::default()),
        Err(EditError::EmptyQuery)
    ));
}

#[test]
fn test_no_matches_is_empty_list() {
    let matches = search("text", "zzz", SearchOptions::default()).unwrap();
    assert!(matches.is_empty());
}

// ========================================================================
// advance
// ========================================================================

#[test]
fn test_advance_wraps_both_ways() {
    let matches = search("a a a", "a", SearchOptions::default()).unwrap();
    assert_eq!(advance(&matches, None, Direction::Forward).unwrap(), 0);
    assert_eq!(advance(&matches, Some(2), Direction::Forward).unwrap(), 0);
    assert_eq!(advance(&matches, None, Direction::Backward).unwrap(), 2);
    assert_eq!(advance(&matches, Some(0), Direction::Backward).unwrap(), 2);
    assert_eq!(advance(&matches, Some(2), Direction::Backward).unwrap(), 1);
}

#[test]
fn test_advance_empty_list() {
    assert!(matches!(
        advance(&[], None, Direction::Forward),
        Err(EditError::NoMatches)
    ));
}

// ========================================================================
// replace
// ========================================================================

#[test]
fn test_replace_all_case_sensitive() {
    let (buffer, count) =
        replace_all("foo Foo foo", "foo", "baz", SearchOptions::case_sensitive()).unwrap();
    assert_eq!(buffer, "baz Foo baz");
    assert_eq!(count, 2);
}

#[test]
fn test_replace_all_no_matches() {
    assert!(matches!(
        replace_all("abc", "x", "y", SearchOptions::default()),
        Err(EditError::NoMatches)
    ));
}

#[test]
fn test_replacement_is_literal() {
    let (buffer, _) = replace_all("a b", "a", "$0$1", SearchOptions::default()).unwrap();
    assert_eq!(buffer, "$0$1 b");
}

#[test]
fn test_repeated_replace_one_equals_replace_all() {
    let original = "one two one three one";
    for replacement in ["1", "uno-uno", ""] {
        let options = SearchOptions::case_sensitive();
        let mut matches = search(original, "one", options).unwrap();
        let mut buffer = original.to_string();
        while !matches.is_empty() {
            buffer = replace_one(&buffer, &mut matches, 0, replacement).unwrap();
        }

        let (expected, _) = replace_all(original, "one", replacement, options).unwrap();
        assert_eq!(buffer, expected);
    }
}

#[test]
fn test_replace_one_shifts_only_later_matches() {
    let buffer = "ab ab ab";
    let mut matches = search(buffer, "ab", SearchOptions::default()).unwrap();

    let result = replace_one(buffer, &mut matches, 1, "xyz").unwrap();
    assert_eq!(result, "ab xyz ab");
    assert_eq!(offsets(&matches), vec![0, 7]);
    assert_eq!(&result[7..9], "ab");
}

// ========================================================================
// FindState
// ========================================================================

#[test]
fn test_find_state_cycles_and_replaces() {
    let mut state = FindState::default();
    let buffer = "x1 x2 x3";
    let options = SearchOptions::default();

    state.find(buffer, "x", options, Direction::Forward).unwrap();
    state.find(buffer, "x", options, Direction::Forward).unwrap();
    state.find(buffer, "x", options, Direction::Forward).unwrap();
    assert_eq!(state.current, Some(2));

    // Replacing the last match wraps the selection to the first
    let buffer = state.replace_current(buffer, "y").unwrap();
    assert_eq!(buffer, "x1 x2 y3");
    assert_eq!(state.current, Some(0));
}

#[test]
fn test_find_state_resets_on_new_query() {
    let mut state = FindState::default();
    let options = SearchOptions::default();
    state.find("a b a b", "a", options, Direction::Forward).unwrap();
    state.find("a b a b", "a", options, Direction::Forward).unwrap();
    assert_eq!(state.current, Some(1));

    let selected = state.find("a b a b", "b", options, Direction::Forward).unwrap();
    assert_eq!(selected.offset, 2);
    assert_eq!(state.current, Some(0));
}

#[test]
fn test_find_state_clears_when_last_match_replaced() {
    let mut state = FindState::default();
    state
        .find("only", "only", SearchOptions::default(), Direction::Forward)
        .unwrap();
    let buffer = state.replace_current("only", "done").unwrap();
    assert_eq!(buffer, "done");
    assert_eq!(state.current, None);
    assert!(state.selected().is_none());
}

// ========================================================================
// Locating matches
// ========================================================================

#[test]
fn test_one_find_lists_every_match_with_location() {
    let mut session = test_session(&"ab\n".repeat(40_000));
    let first = session
        .find("b", SearchOptions::default(), Direction::Forward)
        .unwrap();
    assert_eq!(first.total, 40_000);

    let matches = &session.find_state().matches;
    let locations = locate(session.buffer(), matches);
    assert_eq!(locations.len(), 40_000);
    assert!(locations
        .iter()
        .enumerate()
        .all(|(i, at)| *at == Location { line: i + 1, column: 2 }));
}

#[test]
fn test_locate_stops_at_offsets_outside_buffer() {
    let matches = [Match { offset: 1, length: 1 }, Match { offset: 99, length: 1 }];
    assert_eq!(locate("abc", &matches), vec![Location { line: 1, column: 2 }]);
}
