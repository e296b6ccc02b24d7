//! Section template insertion
//!
//! Resolves `{{name}}` placeholders and splices a section into an existing
//! document at its canonical position, keeping neighbors blank-line separated.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::sections::Catalog;

/// Placeholder names with a built-in default
pub const PLACEHOLDER_NAMES: &[&str] = &[
    "projectName",
    "username",
    "repo",
    "ticketNumber",
    "prTitle",
    "apiUrl",
    "contactEmail",
    "projectDesc",
    "licenseType",
    "buildStatus",
    "buildVersion",
    "date",
];

/// Built-in default for a placeholder name
pub fn default_value(name: &str) -> Option<Cow<'static, str>> {
    let value = match name {
        "projectName" => "Project Name",
        "username" => "username",
        "repo" => "repo",
        "ticketNumber" => "00000",
        "prTitle" => "[Title]",
        "apiUrl" => "https://api.example.com/v1",
        "contactEmail" => "contact@example.com",
        "projectDesc" => {
            "A clear and concise description of what this project does and who it's for."
        }
        "licenseType" => "MIT",
        "buildStatus" => "passing",
        "buildVersion" => "1.0.0",
        "date" => return Some(Cow::Owned(today())),
        _ => return None,
    };
    Some(Cow::Borrowed(value))
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// Caller-supplied placeholder values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placeholders {
    values: BTreeMap<String, String>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Fill names missing (or empty) here from `fallback`
    pub fn layered_over(mut self, fallback: &BTreeMap<String, String>) -> Self {
        for (name, value) in fallback {
            let missing = self.values.get(name).map_or(true, |v| v.is_empty());
            if missing && !value.is_empty() {
                self.values.insert(name.clone(), value.clone());
            }
        }
        self
    }

    /// Explicit non-empty value, else the built-in default
    pub fn resolve(&self, name: &str) -> Option<Cow<'_, str>> {
        match self.values.get(name) {
            Some(value) if !value.is_empty() => Some(Cow::Borrowed(value.as_str())),
            _ => default_value(name),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, String)> for Placeholders {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Substitute every resolvable `{{name}}` token in `template`.
///
/// Tokens with neither a value nor a default are left verbatim.
pub fn render_template(template: &str, placeholders: &Placeholders) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        let Some(close) = after_open.find("}}") else {
            out.push_str(&rest[open..]);
            return out;
        };

        let name = &after_open[..close];
        match placeholders.resolve(name) {
            Some(value) if is_placeholder_name(name) => {
                out.push_str(&value);
                rest = &after_open[close + 2..];
            }
            _ => {
                // Not a token; emit the braces and keep scanning after them
                out.push_str("{{");
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether a line opens a level-one or level-two heading
fn is_section_header(line: &str) -> bool {
    let rest = line
        .strip_prefix("##")
        .or_else(|| line.strip_prefix('#'))
        .unwrap_or(line);

    rest.len() < line.len() && rest.chars().next().is_some_and(char::is_whitespace)
}

/// Byte offset where `section` belongs in `buffer`.
///
/// That is the start of the first heading line naming a canonically later
/// section, or the end of the buffer.
pub fn find_insertion_point(catalog: &Catalog, buffer: &str, section: &str) -> usize {
    let later: Vec<String> = catalog
        .later_than(section)
        .iter()
        .map(|s| s.heading_words())
        .collect();

    if later.is_empty() {
        return buffer.len();
    }

    let mut offset = 0;
    for line in buffer.split('\n') {
        if is_section_header(line) {
            let lower = line.to_lowercase();
            if let Some(words) = later.iter().find(|words| lower.contains(words.as_str())) {
                tracing::debug!(offset, before = %words, "template: insertion point found");
                return offset;
            }
        }
        offset += line.len() + 1;
    }

    buffer.len()
}

/// Result of a template insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// The complete new buffer
    pub buffer: String,
    /// Byte offset where the section text begins (for cursor placement)
    pub offset: usize,
}

/// Insert a section's resolved template into `buffer`.
pub fn insert(
    catalog: &Catalog,
    buffer: &str,
    section: &str,
    placeholders: &Placeholders,
) -> Result<Insertion, EditError> {
    let entry = catalog.get(section).ok_or_else(|| EditError::UnknownSection {
        section: section.to_string(),
    })?;

    if entry.is_present_in(buffer) {
        return Err(EditError::SectionAlreadyPresent {
            section: section.to_string(),
        });
    }

    let resolved = render_template(&entry.template, placeholders);

    if buffer.trim().is_empty() {
        tracing::debug!(section, "template: inserted into empty document");
        return Ok(Insertion {
            buffer: resolved,
            offset: 0,
        });
    }

    let position = find_insertion_point(catalog, buffer, section);
    let bytes = buffer.as_bytes();
    let prefix = if position > 0 && bytes[position - 1] != b'\n' {
        "\n\n"
    } else {
        ""
    };
    let suffix = if position < bytes.len() && bytes[position] != b'\n' {
        "\n\n"
    } else {
        ""
    };

    let mut out =
        String::with_capacity(buffer.len() + prefix.len() + resolved.len() + suffix.len());
    out.push_str(&buffer[..position]);
    out.push_str(prefix);
    out.push_str(&resolved);
    out.push_str(suffix);
    out.push_str(&buffer[position..]);

    tracing::debug!(section, position, "template: inserted section");
    Ok(Insertion {
        buffer: out,
        offset: position + prefix.len(),
    })
}
