//! Section catalog and document analysis
//!
//! The catalog is declarative configuration: an ordered list of named
//! sections, each with detection patterns and a template body. The built-in
//! catalog ships as YAML; a user catalog with the same shape can replace it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use thiserror::Error;

const BUILTIN_CATALOG: &str = include_str!("catalog.yaml");

/// Errors that can occur when loading a section catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse section catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read section catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("section '{section}' has an invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        section: String,
        pattern: String,
        source: regex::Error,
    },

    #[error("section '{0}' is defined more than once")]
    DuplicateSection(String),

    #[error("section catalog defines no sections")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    version: u32,
    sections: Vec<SectionEntry>,
}

#[derive(Debug, Deserialize)]
struct SectionEntry {
    name: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    patterns: Vec<String>,
    template: String,
}

/// A named, orderable template unit
#[derive(Debug, Clone)]
pub struct Section {
    pub name: String,
    /// Human-readable name for menus
    pub label: String,
    /// Body with `{{name}}` placeholders
    pub template: String,
    patterns: Vec<Regex>,
}

impl Section {
    /// Whether any detection pattern matches the whole text or one of its lines
    pub fn is_present_in(&self, buffer: &str) -> bool {
        self.patterns.iter().any(|pattern| {
            pattern.is_match(buffer) || buffer.split('\n').any(|line| pattern.is_match(line))
        })
    }

    /// Lowercased words of the name, split on case boundaries
    pub fn heading_words(&self) -> String {
        heading_words(&self.name)
    }
}

/// Split a camelCase name into lowercase words.
///
/// A run of capitals is one word: `quickPR` → `quick pr`,
/// `apiReference` → `api reference`.
pub fn heading_words(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if i > 0 && ch.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if !prev.is_uppercase() || next_is_lower {
                out.push(' ');
            }
        }
        out.extend(ch.to_lowercase());
    }

    out.trim().to_string()
}

/// Ordered, versioned set of sections
#[derive(Debug, Clone)]
pub struct Catalog {
    pub version: u32,
    sections: Vec<Section>,
}

impl Catalog {
    /// The catalog bundled with the crate
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml(BUILTIN_CATALOG)
    }

    /// Load a catalog from a YAML file
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let source = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml(&source)?;
        tracing::info!(
            "Loaded section catalog v{} ({} sections) from {}",
            catalog.version,
            catalog.sections.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse a catalog from YAML source
    pub fn from_yaml(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(source)?;
        if file.sections.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        let mut sections = Vec::with_capacity(file.sections.len());

        for entry in file.sections {
            if !seen.insert(entry.name.clone()) {
                return Err(CatalogError::DuplicateSection(entry.name));
            }

            let patterns = entry
                .patterns
                .iter()
                .map(|pattern| {
                    RegexBuilder::new(pattern)
                        .case_insensitive(true)
                        .build()
                        .map_err(|source| CatalogError::InvalidPattern {
                            section: entry.name.clone(),
                            pattern: pattern.clone(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            sections.push(Section {
                label: entry.label.unwrap_or_else(|| entry.name.clone()),
                name: entry.name,
                template: entry.template,
                patterns,
            });
        }

        Ok(Self {
            version: file.version,
            sections,
        })
    }

    /// Sections in canonical order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Canonical position of a section
    pub fn position(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.name == name)
    }

    /// Sections canonically after `name` (empty for unknown names)
    pub fn later_than(&self, name: &str) -> &[Section] {
        match self.position(name) {
            Some(index) => &self.sections[index + 1..],
            None => &[],
        }
    }

    /// Classify `buffer` against every section
    pub fn analyze(&self, buffer: &str) -> SectionReport {
        let entries: Vec<(String, bool)> = self
            .sections
            .iter()
            .map(|section| (section.name.clone(), section.is_present_in(buffer)))
            .collect();

        let report = SectionReport { entries };
        tracing::debug!(
            found = report.present_count(),
            total = report.len(),
            "sections: analyzed document"
        );
        report
    }
}

/// Presence of each catalog section, in canonical order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    entries: Vec<(String, bool)>,
}

impl SectionReport {
    /// Whether `name` was detected (false for unknown names)
    pub fn is_present(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|(section, present)| section == name && *present)
    }

    pub fn present_count(&self) -> usize {
        self.entries.iter().filter(|(_, present)| *present).count()
    }

    /// Names of sections not found in the document
    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, present)| !present)
            .map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.entries
            .iter()
            .map(|(name, present)| (name.as_str(), *present))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin().expect("builtin catalog parses")
    }

    // ========================================================================
    // Catalog loading
    // ========================================================================

    #[test]
    fn test_builtin_order() {
        let binding = catalog();
        let names: Vec<&str> = binding.sections().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "quickPR",
                "badges",
                "description",
                "quickstart",
                "prerequisites",
                "installation",
                "configuration",
                "usage",
                "testing",
                "api",
                "troubleshooting",
                "deployment",
                "contributing",
                "security",
                "license",
                "changelog",
            ]
        );
    }

    #[test]
    fn test_builtin_templates_keep_trailing_blank_line() {
        let catalog = catalog();
        let license = catalog.get("license").unwrap();
        assert!(license.template.starts_with("## License\n\n"));
        assert!(license.template.ends_with("for details.\n\n"));

        let pr = catalog.get("quickPR").unwrap();
        assert!(pr.template.ends_with("**Ticket:** {{ticketNumber}}\n"));
    }

    #[test]
    fn test_duplicate_section_rejected() {
        let yaml = "version: 1\nsections:\n  - name: a\n    template: x\n  - name: a\n    template: y\n";
        assert!(matches!(
            Catalog::from_yaml(yaml),
            Err(CatalogError::DuplicateSection(name)) if name == "a"
        ));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let yaml = "version: 1\nsections:\n  - name: a\n    patterns: ['(']\n    template: x\n";
        assert!(matches!(
            Catalog::from_yaml(yaml),
            Err(CatalogError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            Catalog::from_yaml("version: 2\nsections: []\n"),
            Err(CatalogError::Empty)
        ));
    }

    // ========================================================================
    // Heading words
    // ========================================================================

    #[test]
    fn test_heading_words() {
        assert_eq!(heading_words("license"), "license");
        assert_eq!(heading_words("quickPR"), "quick pr");
        assert_eq!(heading_words("apiReference"), "api reference");
        assert_eq!(heading_words("HTTPServer"), "http server");
    }

    // ========================================================================
    // Analysis
    // ========================================================================

    #[test]
    fn test_analyze_header_lines() {
        let report = catalog().analyze("# Project\n\n## Installation\n\nstuff\n\n## License\nMIT\n");
        assert!(report.is_present("installation"));
        assert!(report.is_present("license"));
        assert!(!report.is_present("usage"));
        assert!(!report.is_present("security"));
    }

    #[test]
    fn test_analyze_keyword_anywhere() {
        let report = catalog().analyze("Run with jest for the tests.");
        assert!(report.is_present("testing"));
    }

    #[test]
    fn test_analyze_case_insensitive() {
        let report = catalog().analyze("## CONTRIBUTING\n");
        assert!(report.is_present("contributing"));
    }

    #[test]
    fn test_analyze_empty_buffer() {
        let report = catalog().analyze("");
        assert_eq!(report.present_count(), 0);
        assert_eq!(report.len(), 16);
        assert_eq!(report.missing().count(), 16);
    }

    #[test]
    fn test_unknown_section_not_present() {
        let report = catalog().analyze("## License");
        assert!(!report.is_present("nonexistent"));
    }

    #[test]
    fn test_later_than() {
        let catalog = catalog();
        let later: Vec<&str> = catalog
            .later_than("security")
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(later, vec!["license", "changelog"]);
        assert!(catalog.later_than("bogus").is_empty());
    }
}
