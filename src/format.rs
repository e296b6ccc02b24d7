//! Formatting commands, prettify and document statistics

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// A formatting command applied to the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Bold,
    Italic,
    Strike,
    Code,
    Link,
    H1,
    H2,
    H3,
    Quote,
    BulletList,
    NumberedList,
    TaskList,
    CodeBlock,
    Table,
    Rule,
    Details,
}

const TABLE: &str = "| Column 1 | Column 2 | Column 3 |\n\
|----------|----------|----------|\n\
| Cell 1   | Cell 2   | Cell 3   |\n\
| Cell 4   | Cell 5   | Cell 6   |";

/// Result of applying a format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatEdit {
    pub buffer: String,
    /// Byte offset for the cursor after the edit
    pub cursor: usize,
}

fn map_lines(selected: &str, f: impl Fn(usize, &str) -> String) -> String {
    selected
        .split('\n')
        .enumerate()
        .map(|(i, line)| f(i, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replacement text and cursor position (relative to the replacement start)
fn format_selection(format: Format, selected: &str) -> (String, usize) {
    let has_selection = !selected.is_empty();
    let or = |placeholder: &'static str| if has_selection { selected } else { placeholder };

    match format {
        Format::Bold => {
            let text = format!("**{}**", or("bold text"));
            let cursor = if has_selection { text.len() } else { 2 };
            (text, cursor)
        }
        Format::Italic => {
            let text = format!("*{}*", or("italic text"));
            let cursor = if has_selection { text.len() } else { 1 };
            (text, cursor)
        }
        Format::Strike => {
            let text = format!("~~{}~~", or("strikethrough text"));
            let cursor = if has_selection { text.len() } else { 2 };
            (text, cursor)
        }
        Format::Code => {
            let text = format!("`{}`", or("code"));
            let cursor = if has_selection { text.len() } else { 1 };
            (text, cursor)
        }
        Format::Link => {
            let text = format!("[{}](url)", or("link text"));
            // Selected text: cursor lands on "url"
            let cursor = if has_selection { text.len() - 4 } else { 1 };
            (text, cursor)
        }
        Format::H1 | Format::H2 | Format::H3 | Format::Quote => {
            let (marker, placeholder) = match format {
                Format::H1 => ("#", "Heading 1"),
                Format::H2 => ("##", "Heading 2"),
                Format::H3 => ("###", "Heading 3"),
                _ => (">", "Quote text"),
            };
            let text = format!("{} {}", marker, or(placeholder));
            let cursor = text.len();
            (text, cursor)
        }
        Format::BulletList => {
            let text = if has_selection {
                map_lines(selected, |_, line| format!("- {}", line))
            } else {
                "- List item 1\n- List item 2\n- List item 3".to_string()
            };
            let cursor = text.len();
            (text, cursor)
        }
        Format::NumberedList => {
            let text = if has_selection {
                map_lines(selected, |i, line| format!("{}. {}", i + 1, line))
            } else {
                "1. List item 1\n2. List item 2\n3. List item 3".to_string()
            };
            let cursor = text.len();
            (text, cursor)
        }
        Format::TaskList => {
            let text = if has_selection {
                map_lines(selected, |_, line| format!("- [ ] {}", line))
            } else {
                "- [ ] Task 1\n- [ ] Task 2\n- [ ] Task 3".to_string()
            };
            let cursor = text.len();
            (text, cursor)
        }
        Format::CodeBlock => {
            let text = format!("```javascript\n{}\n```", or("// Code here"));
            let cursor = if has_selection { text.len() - 4 } else { 14 };
            (text, cursor)
        }
        Format::Table => (TABLE.to_string(), TABLE.len()),
        Format::Rule => ("---".to_string(), 3),
        Format::Details => {
            let text = format!(
                "<details>\n<summary>{}</summary>\n\nContent here\n\n</details>",
                or("Click to expand")
            );
            let cursor = text.find("Content here").unwrap_or(text.len());
            (text, cursor)
        }
    }
}

/// Apply `format` to the byte range `selection` of `buffer`.
///
/// The range is clamped to the buffer and must fall on char boundaries;
/// otherwise it collapses to an empty selection at the end of the buffer.
pub fn apply_format(buffer: &str, selection: Range<usize>, format: Format) -> FormatEdit {
    let start = selection.start.min(buffer.len());
    let end = selection.end.clamp(start, buffer.len());
    let (start, end) = if buffer.is_char_boundary(start) && buffer.is_char_boundary(end) {
        (start, end)
    } else {
        (buffer.len(), buffer.len())
    };

    let (replacement, cursor) = format_selection(format, &buffer[start..end]);

    let mut out = String::with_capacity(buffer.len() + replacement.len());
    out.push_str(&buffer[..start]);
    out.push_str(&replacement);
    out.push_str(&buffer[end..]);

    tracing::debug!(?format, start, end, "format: applied");
    FormatEdit {
        buffer: out,
        cursor: start + cursor,
    }
}

static CRLF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n").expect("valid regex"));
static BEFORE_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\n])\n(#{1,6} .+)").expect("valid regex"));
static AFTER_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(#{1,6} .+)\n([^\n#])").expect("valid regex"));
static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*[-*+] ").expect("valid regex"));
static NUMBER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(\d+)\. ").expect("valid regex"));
static TRAILING_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)[ \t]+$").expect("valid regex"));
static BLANK_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));
static FINAL_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n*\z").expect("valid regex"));

/// Normalize spacing and list markers.
///
/// Returns `None` when the buffer is blank (nothing to prettify).
pub fn prettify(content: &str) -> Option<String> {
    if content.trim().is_empty() {
        return None;
    }

    let text = CRLF.replace_all(content, "\n");
    let text = BEFORE_HEADING.replace_all(&text, "$1\n\n$2");
    let text = AFTER_HEADING.replace_all(&text, "$1\n\n$2");
    let text = BULLET_MARKER.replace_all(&text, "- ");
    let text = NUMBER_MARKER.replace_all(&text, "$1. ");
    let text = TRAILING_WS.replace_all(&text, "");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    let text = FINAL_NEWLINES.replace(&text, "\n");

    Some(text.into_owned())
}

/// Word, character and line counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub words: usize,
    pub chars: usize,
    pub lines: usize,
}

impl DocumentStats {
    pub fn of(content: &str) -> Self {
        Self {
            words: content.split_whitespace().count(),
            chars: content.chars().count(),
            lines: content.split('\n').count(),
        }
    }
}
