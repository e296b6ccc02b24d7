//! Structural linter tests

mod common;

use common::BROKEN_README;
use markwright::validation::validate;
use markwright::IssueKind;

fn kinds(content: &str) -> Vec<(usize, IssueKind)> {
    validate(content)
        .into_iter()
        .map(|issue| (issue.line, issue.kind))
        .collect()
}

// ========================================================================
// Line checks
// ========================================================================

#[test]
fn test_every_line_check_fires_on_its_line() {
    assert_eq!(
        kinds(BROKEN_README),
        vec![
            (1, IssueKind::HeadingSpace),
            (3, IssueKind::ListMarkerSpace),
            (4, IssueKind::OrderedListSpace),
            (5, IssueKind::BlockquoteSpace),
            (6, IssueKind::TaskCheckboxSpace),
            (7, IssueKind::LeadingTab),
            (8, IssueKind::TrailingWhitespace),
            (9, IssueKind::EmptyLinkDestination),
        ]
    );
}

#[test]
fn test_clean_document_has_no_issues() {
    let doc = "# Title\n\n- item\n* other\n1. first\n> quote\n- [ ] todo\n[docs](https://x.test)\n";
    assert!(validate(doc).is_empty());
}

#[test]
fn test_horizontal_rule_and_bold_are_not_list_markers() {
    assert!(validate("---\n***\n**bold** text\n").is_empty());
}

#[test]
fn test_two_trailing_spaces_are_a_line_break() {
    assert!(validate("line break  \nnext\n").is_empty());
    assert_eq!(kinds("too many   \n"), vec![(1, IssueKind::TrailingWhitespace)]);
}

#[test]
fn test_bare_marker_line_is_not_reported() {
    assert!(validate("-\n1.\n").is_empty());
}

#[test]
fn test_issue_display() {
    let issues = validate("#Title\n");
    assert_eq!(
        issues[0].to_string(),
        format!("Line 1: {}", IssueKind::HeadingSpace.message())
    );
}

// ========================================================================
// Fences
// ========================================================================

#[test]
fn test_fenced_content_is_skipped() {
    let doc = "```\n#not a heading\n-not a list\n```\n#Real\n";
    assert_eq!(kinds(doc), vec![(5, IssueKind::HeadingSpace)]);
}

#[test]
fn test_unclosed_backtick_fence_reported_at_opener() {
    let doc = "# Title\n\n```rust\nfn main() {}\n";
    assert_eq!(kinds(doc), vec![(3, IssueKind::UnclosedBacktickFence)]);
}

#[test]
fn test_unclosed_tilde_fence_reported_at_opener() {
    let doc = "~~~\ncode\n";
    assert_eq!(kinds(doc), vec![(1, IssueKind::UnclosedTildeFence)]);
}

#[test]
fn test_other_fence_kind_inside_fence_is_content() {
    let doc = "~~~\n```\n#inside\n~~~\n";
    assert!(validate(doc).is_empty());
}

#[test]
fn test_issues_are_in_line_order() {
    let doc = "```\nunclosed\n";
    let issues = validate(&format!("#Bad\n{}", doc));
    let lines: Vec<usize> = issues.iter().map(|i| i.line).collect();
    assert_eq!(lines, vec![1, 2]);
}
