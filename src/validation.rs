//! Structural Markdown linting
//!
//! A single pass over the lines of a buffer. Fenced code regions (``` or ~~~)
//! suspend all content checks until their closer; an unclosed fence is
//! reported once, at its opening line.

use std::fmt;

use serde::Serialize;

/// Kind of structural defect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    HeadingSpace,
    ListMarkerSpace,
    OrderedListSpace,
    BlockquoteSpace,
    TaskCheckboxSpace,
    LeadingTab,
    TrailingWhitespace,
    EmptyLinkDestination,
    UnclosedBacktickFence,
    UnclosedTildeFence,
}

impl IssueKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::HeadingSpace => "Add a space after the # characters in headings.",
            Self::ListMarkerSpace => "List markers (-, *, +) need a space before the text.",
            Self::OrderedListSpace => "Numbered lists need a space after the period.",
            Self::BlockquoteSpace => "Add a space after the blockquote (>) marker.",
            Self::TaskCheckboxSpace => "Add a space after task list checkboxes.",
            Self::LeadingTab => "Replace leading tabs with spaces for consistent rendering.",
            Self::TrailingWhitespace => "Remove trailing spaces at the end of the line.",
            Self::EmptyLinkDestination => "Links should contain a destination URL.",
            Self::UnclosedBacktickFence => "Code fence opened with ``` is not closed.",
            Self::UnclosedTildeFence => "Code fence opened with ~~~ is not closed.",
        }
    }
}

/// A single structural defect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// 1-based line number
    pub line: usize,
    pub kind: IssueKind,
    pub message: String,
}

impl ValidationIssue {
    fn new(line: usize, kind: IssueKind) -> Self {
        Self {
            line,
            kind,
            message: kind.message().to_string(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line {}: {}", self.line, self.message)
    }
}

/// Trailing whitespace runs longer than this are reported
const MAX_TRAILING_WHITESPACE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenceState {
    Unfenced,
    Backtick { opened_at: usize },
    Tilde { opened_at: usize },
}

/// Scan `content` and report structural issues in line order.
pub fn validate(content: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut fence = FenceState::Unfenced;

    for (index, line) in content.split('\n').enumerate() {
        let line_number = index + 1;
        let trimmed = line.trim();

        // A backtick line inside a tilde fence (and vice versa) is content
        if trimmed.starts_with("```") && !matches!(fence, FenceState::Tilde { .. }) {
            fence = match fence {
                FenceState::Unfenced => FenceState::Backtick {
                    opened_at: line_number,
                },
                _ => FenceState::Unfenced,
            };
            continue;
        }

        if trimmed.starts_with("~~~") && !matches!(fence, FenceState::Backtick { .. }) {
            fence = match fence {
                FenceState::Unfenced => FenceState::Tilde {
                    opened_at: line_number,
                },
                _ => FenceState::Unfenced,
            };
            continue;
        }

        if fence != FenceState::Unfenced {
            continue;
        }

        check_line(line, line_number, &mut issues);
    }

    match fence {
        FenceState::Backtick { opened_at } => {
            issues.push(ValidationIssue::new(opened_at, IssueKind::UnclosedBacktickFence))
        }
        FenceState::Tilde { opened_at } => {
            issues.push(ValidationIssue::new(opened_at, IssueKind::UnclosedTildeFence))
        }
        FenceState::Unfenced => {}
    }

    tracing::debug!(count = issues.len(), "validation: scan complete");
    issues
}

fn check_line(line: &str, line_number: usize, issues: &mut Vec<ValidationIssue>) {
    let mut report = |kind| issues.push(ValidationIssue::new(line_number, kind));
    let normalized = line.trim_start();
    let indented = line.trim_start_matches([' ', '\t']);

    if heading_missing_space(normalized) {
        report(IssueKind::HeadingSpace);
    }

    if let Some(remainder) = unordered_marker_remainder(indented) {
        if missing_space_before_text(remainder) {
            report(IssueKind::ListMarkerSpace);
        }
    }

    if let Some(remainder) = ordered_marker_remainder(indented) {
        if missing_space_before_text(remainder) {
            report(IssueKind::OrderedListSpace);
        }
    }

    if let Some(after) = normalized.strip_prefix('>') {
        if !starts_with_whitespace(after) {
            report(IssueKind::BlockquoteSpace);
        }
    }

    if let Some(after) = task_checkbox_remainder(indented) {
        if !starts_with_whitespace(after) {
            report(IssueKind::TaskCheckboxSpace);
        }
    }

    if line.starts_with('\t') {
        report(IssueKind::LeadingTab);
    }

    let trailing = line.len() - line.trim_end_matches([' ', '\t']).len();
    if trailing > MAX_TRAILING_WHITESPACE {
        report(IssueKind::TrailingWhitespace);
    }

    if has_empty_link(line) {
        report(IssueKind::EmptyLinkDestination);
    }
}

fn starts_with_whitespace(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_whitespace)
}

/// Text follows the marker directly, with no separating space
fn missing_space_before_text(remainder: &str) -> bool {
    !remainder.trim().is_empty() && !starts_with_whitespace(remainder)
}

/// One to six `#` not followed by whitespace
fn heading_missing_space(normalized: &str) -> bool {
    let hashes = normalized.len() - normalized.trim_start_matches('#').len();
    if hashes == 0 {
        return false;
    }
    hashes > 6 || !starts_with_whitespace(&normalized[hashes..])
}

/// Text after a single (not doubled) `-`, `*` or `+` marker
fn unordered_marker_remainder(indented: &str) -> Option<&str> {
    let marker = indented.chars().next().filter(|c| matches!(c, '-' | '*' | '+'))?;
    let remainder = &indented[1..];
    if remainder.starts_with(marker) {
        return None;
    }
    Some(remainder)
}

/// Text after a `digits.` marker
fn ordered_marker_remainder(indented: &str) -> Option<&str> {
    let digits = indented.len() - indented.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    indented[digits..].strip_prefix('.')
}

/// Text after `- [ ]`, `- [x]` or `- [X]`
fn task_checkbox_remainder(indented: &str) -> Option<&str> {
    let rest = indented.strip_prefix('-')?;
    let space = rest.chars().next().filter(|c| c.is_whitespace())?;
    let rest = rest[space.len_utf8()..].strip_prefix('[')?;
    let rest = rest.strip_prefix([' ', 'x', 'X'])?;
    rest.strip_prefix(']')
}

/// `[text]()` with only whitespace between the parentheses
fn has_empty_link(line: &str) -> bool {
    let mut from = 0;
    while let Some(open) = line[from..].find('[') {
        let text_start = from + open + 1;
        if let Some(close) = line[text_start..].find(']') {
            if close > 0 {
                let after = &line[text_start + close + 1..];
                if let Some(inside) = after.strip_prefix('(') {
                    if inside.trim_start().starts_with(')') {
                        return true;
                    }
                }
            }
        }
        from = text_start;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(content: &str) -> Vec<(usize, IssueKind)> {
        validate(content).into_iter().map(|i| (i.line, i.kind)).collect()
    }

    // ========================================================================
    // Line checks
    // ========================================================================

    #[test]
    fn test_heading_and_ordered_list() {
        assert_eq!(
            kinds("#Heading\n- ok item\n1.bad item\n"),
            vec![(1, IssueKind::HeadingSpace), (3, IssueKind::OrderedListSpace)]
        );
    }

    #[test]
    fn test_heading_variants() {
        assert!(kinds("# ok\n###### six ok").is_empty());
        assert_eq!(kinds("####### seven"), vec![(1, IssueKind::HeadingSpace)]);
        assert_eq!(kinds("  ##indented"), vec![(1, IssueKind::HeadingSpace)]);
        assert_eq!(kinds("#"), vec![(1, IssueKind::HeadingSpace)]);
    }

    #[test]
    fn test_list_markers() {
        assert_eq!(kinds("-item"), vec![(1, IssueKind::ListMarkerSpace)]);
        assert_eq!(kinds("  +item"), vec![(1, IssueKind::ListMarkerSpace)]);
        assert!(kinds("**bold** text").is_empty());
        assert!(kinds("---").is_empty());
        assert!(kinds("-").is_empty());
        assert!(kinds("- ").is_empty());
        assert!(kinds("* item").is_empty());
    }

    #[test]
    fn test_ordered_list_empty_remainder() {
        assert!(kinds("12.").is_empty());
        assert!(kinds("3. three").is_empty());
        assert_eq!(kinds("  42.x"), vec![(1, IssueKind::OrderedListSpace)]);
    }

    #[test]
    fn test_blockquote() {
        assert!(kinds("> quoted").is_empty());
        assert_eq!(kinds(">quoted"), vec![(1, IssueKind::BlockquoteSpace)]);
    }

    #[test]
    fn test_task_checkbox() {
        assert!(kinds("- [ ] todo").is_empty());
        assert!(kinds("- [x] done").is_empty());
        assert_eq!(kinds("- [X]done"), vec![(1, IssueKind::TaskCheckboxSpace)]);
    }

    #[test]
    fn test_leading_tab_and_list_marker() {
        assert_eq!(
            kinds("\t-item"),
            vec![(1, IssueKind::ListMarkerSpace), (1, IssueKind::LeadingTab)]
        );
    }

    #[test]
    fn test_trailing_whitespace() {
        assert!(kinds("two spaces  ").is_empty());
        assert_eq!(kinds("three   "), vec![(1, IssueKind::TrailingWhitespace)]);
        assert_eq!(kinds("mixed \t "), vec![(1, IssueKind::TrailingWhitespace)]);
    }

    #[test]
    fn test_empty_link() {
        assert_eq!(kinds("see [docs]()"), vec![(1, IssueKind::EmptyLinkDestination)]);
        assert_eq!(kinds("see [docs](  )"), vec![(1, IssueKind::EmptyLinkDestination)]);
        assert!(kinds("see [docs](https://x.y)").is_empty());
        assert!(kinds("empty []()").is_empty());
        assert_eq!(
            kinds("[a] then [b]()"),
            vec![(1, IssueKind::EmptyLinkDestination)]
        );
    }

    // ========================================================================
    // Fences
    // ========================================================================

    #[test]
    fn test_unclosed_backtick_fence_suppresses_checks() {
        let content = "ok\n```rust\n#nospace\n-item\n";
        assert_eq!(kinds(content), vec![(2, IssueKind::UnclosedBacktickFence)]);
    }

    #[test]
    fn test_closed_fence_resumes_checks() {
        let content = "```\n#inside\n```\n#outside";
        assert_eq!(kinds(content), vec![(4, IssueKind::HeadingSpace)]);
    }

    #[test]
    fn test_tilde_fence_ignores_backticks() {
        let content = "~~~\n```\n#x\n~~~\n";
        assert!(kinds(content).is_empty());
    }

    #[test]
    fn test_unclosed_tilde_fence() {
        let content = "text\n\n  ~~~\nbody";
        assert_eq!(kinds(content), vec![(3, IssueKind::UnclosedTildeFence)]);
    }

    #[test]
    fn test_issue_display() {
        let issues = validate(">x");
        assert_eq!(
            issues[0].to_string(),
            "Line 1: Add a space after the blockquote (>) marker."
        );
    }
}
