//! Command-line argument parsing
//!
//! Every command reads one document. Commands that edit it print the result
//! to stdout, or overwrite the file with `--write`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::format::Format;
use crate::search::{Direction, SearchOptions};

/// Structured Markdown editing from the command line
#[derive(Parser, Debug)]
#[command(
    name = "markwright",
    version,
    about = "Lint, analyze and edit structured Markdown documents"
)]
pub struct CliArgs {
    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Report structural Markdown issues
    Validate { file: PathBuf },

    /// Show which catalog sections the document contains
    Analyze { file: PathBuf },

    /// List the section catalog in canonical order
    Sections,

    /// Insert a section template at its canonical position
    Insert {
        file: PathBuf,
        /// Catalog section name, e.g. `installation`
        section: String,
        /// Placeholder value (repeatable), e.g. `--set projectName=Demo`
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
        /// Remember `--set` values for later insertions
        #[arg(long)]
        remember: bool,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Apply a formatting command to a byte range
    Format {
        file: PathBuf,
        #[arg(value_enum)]
        format: FormatArg,
        /// Selection start (byte offset)
        #[arg(long, default_value_t = 0)]
        start: usize,
        /// Selection end (byte offset, defaults to start)
        #[arg(long)]
        end: Option<usize>,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Locate literal matches of a query
    Find {
        file: PathBuf,
        query: String,
        #[command(flatten)]
        search: SearchArgs,
    },

    /// Replace literal matches of a query
    Replace {
        file: PathBuf,
        query: String,
        replacement: String,
        /// Replace only the Nth match instead of all (1-based, counted from
        /// the start of the document regardless of --backward)
        #[arg(long, value_name = "N")]
        nth: Option<usize>,
        #[command(flatten)]
        search: SearchArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Normalize spacing, list markers and trailing whitespace
    Prettify {
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Word, character and line counts
    Stats { file: PathBuf },

    /// Render the document to HTML
    Render {
        file: PathBuf,
        /// Wrap the fragment in a standalone HTML page
        #[arg(long)]
        standalone: bool,
        /// Write HTML here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Where an edited buffer goes
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputArgs {
    /// Overwrite the input file instead of printing the result
    #[arg(short, long)]
    pub write: bool,
}

/// Find/replace flags; unset flags fall back to the config defaults
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SearchArgs {
    /// Match case exactly
    #[arg(short = 'c', long, overrides_with = "ignore_case")]
    pub case_sensitive: bool,
    /// Ignore case, even when the config asks for case-sensitive search
    #[arg(short = 'i', long, overrides_with = "case_sensitive")]
    pub ignore_case: bool,
    /// Only match whole words
    #[arg(short = 'W', long, overrides_with = "no_whole_word")]
    pub whole_word: bool,
    /// Match inside words, even when the config asks for whole words
    #[arg(long, overrides_with = "whole_word")]
    pub no_whole_word: bool,
    /// Report matches last to first
    #[arg(long)]
    pub backward: bool,
}

impl SearchArgs {
    pub fn options(&self, defaults: SearchOptions) -> SearchOptions {
        SearchOptions {
            case_sensitive: flag(self.case_sensitive, self.ignore_case)
                .unwrap_or(defaults.case_sensitive),
            whole_word: flag(self.whole_word, self.no_whole_word).unwrap_or(defaults.whole_word),
        }
    }

    pub fn direction(&self) -> Direction {
        if self.backward {
            Direction::Backward
        } else {
            Direction::Forward
        }
    }
}

/// Resolve an on/off flag pair; `None` when neither was given
fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// Formatting commands exposed on the command line
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Bold,
    Italic,
    Strike,
    Code,
    Link,
    H1,
    H2,
    H3,
    Quote,
    Bullet,
    Numbered,
    Task,
    CodeBlock,
    Table,
    Rule,
    Details,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Bold => Format::Bold,
            FormatArg::Italic => Format::Italic,
            FormatArg::Strike => Format::Strike,
            FormatArg::Code => Format::Code,
            FormatArg::Link => Format::Link,
            FormatArg::H1 => Format::H1,
            FormatArg::H2 => Format::H2,
            FormatArg::H3 => Format::H3,
            FormatArg::Quote => Format::Quote,
            FormatArg::Bullet => Format::BulletList,
            FormatArg::Numbered => Format::NumberedList,
            FormatArg::Task => Format::TaskList,
            FormatArg::CodeBlock => Format::CodeBlock,
            FormatArg::Table => Format::Table,
            FormatArg::Rule => Format::Rule,
            FormatArg::Details => Format::Details,
        }
    }
}

/// Parse `NAME=VALUE`; the value may be empty and may contain `=`
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{}`", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing placeholder name in `{}`", raw));
    }
    Ok((name.to_string(), value.to_string()))
}
