use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use markwright::cli::{CliArgs, Command, OutputArgs};
use markwright::config::EditorConfig;
use markwright::persistence::{FileStore, Persistence};
use markwright::render::{to_html_document, MarkdownRenderer, Renderer};
use markwright::search::{locate, Direction, Location, Match};
use markwright::sections::Catalog;
use markwright::util::{filename_for_display, read_document};
use markwright::{EditError, Session};

fn main() -> Result<ExitCode> {
    let args = CliArgs::parse();
    markwright::tracing::init();

    let config = match &args.config {
        Some(path) => EditorConfig::load_from(path),
        None => EditorConfig::load(),
    };
    let catalog = load_catalog(&config)?;
    let session = Session::from_config(catalog, &config);

    run(args, &config, session)
}

fn load_catalog(config: &EditorConfig) -> Result<Catalog> {
    match config.catalog_path() {
        Some(path) => Catalog::load(&path)
            .with_context(|| format!("Failed to load section catalog {}", path.display())),
        None => Catalog::builtin().context("Built-in section catalog is invalid"),
    }
}

fn open(session: &mut Session, path: &Path) -> Result<()> {
    let content = read_document(path)
        .map_err(|e| anyhow::anyhow!(e.user_message(&filename_for_display(path))))?;
    session.load(content);
    Ok(())
}

/// Print the edited buffer, or write it back with `--write`
fn emit(session: &Session, path: &Path, output: OutputArgs, json: bool) -> Result<()> {
    if output.write {
        std::fs::write(path, session.buffer())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Wrote {}", path.display());
    }

    if json {
        let value = json!({
            "file": path.display().to_string(),
            "written": output.write,
            "buffer": session.buffer(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if !output.write {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(session.buffer().as_bytes())?;
        stdout.flush()?;
    }
    Ok(())
}

/// 1-based line and column (in chars) of a byte offset
fn run(args: CliArgs, config: &EditorConfig, mut session: Session) -> Result<ExitCode> {
    let json = args.json;

    match args.command {
        Command::Validate { file } => {
            open(&mut session, &file)?;
            let issues = session.validate();

            if json {
                println!("{}", serde_json::to_string_pretty(&issues)?);
            } else if issues.is_empty() {
                println!("No issues found.");
            } else {
                for issue in &issues {
                    println!("{}", issue);
                }
            }

            Ok(if issues.is_empty() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Command::Analyze { file } => {
            open(&mut session, &file)?;
            let report = session.analyze();
            let labels = session.catalog().sections();

            if json {
                let sections: Vec<_> = report
                    .iter()
                    .zip(labels)
                    .map(|((name, present), section)| {
                        json!({ "name": name, "label": section.label, "present": present })
                    })
                    .collect();
                let value = json!({
                    "present": report.present_count(),
                    "total": report.len(),
                    "sections": sections,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                for ((name, present), section) in report.iter().zip(labels) {
                    let mark = if present { "x" } else { " " };
                    println!("[{}] {:<16} {}", mark, name, section.label);
                }
                println!(
                    "\n{} of {} sections present",
                    report.present_count(),
                    report.len()
                );
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Sections => {
            let catalog = session.catalog();
            if json {
                let sections: Vec<_> = catalog
                    .sections()
                    .iter()
                    .map(|s| json!({ "name": s.name, "label": s.label, "heading": s.heading_words() }))
                    .collect();
                let value = json!({ "version": catalog.version, "sections": sections });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                for (i, section) in catalog.sections().iter().enumerate() {
                    println!("{:>2}. {:<16} {}", i + 1, section.name, section.label);
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Insert {
            file,
            section,
            values,
            remember,
            output,
        } => {
            open(&mut session, &file)?;

            let mut persistence = match config.storage.resolved_path() {
                Some(path) => Some(Persistence::new(
                    FileStore::open(path.clone(), Some(config.storage.quota_bytes))
                        .with_context(|| format!("Failed to open storage {}", path.display()))?,
                )),
                None => None,
            };

            let mut placeholders = match &persistence {
                Some(p) => p.load_placeholders()?.unwrap_or_default(),
                None => Default::default(),
            };
            for (name, value) in values {
                placeholders.set(name, value);
            }

            if remember {
                if let Some(p) = persistence.as_mut() {
                    // Storage failures never block the edit itself
                    if let Err(e) = p.save_placeholders(&placeholders) {
                        tracing::warn!("Failed to remember placeholder values: {}", e);
                    }
                }
            }
            session.set_placeholders(placeholders);

            match session.insert_section(&section) {
                Ok(offset) => {
                    tracing::debug!(offset, "Inserted section {}", section);
                    emit(&session, &file, output, json)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) if e.is_informational() => {
                    eprintln!("{}", e);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Err(e.into()),
            }
        }

        Command::Format {
            file,
            format,
            start,
            end,
            output,
        } => {
            open(&mut session, &file)?;
            let cursor = session.apply_format(start..end.unwrap_or(start), format.into());
            tracing::debug!(cursor, "Applied {:?}", format);
            emit(&session, &file, output, json)?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Find {
            file,
            query,
            search,
        } => {
            open(&mut session, &file)?;
            let options = search.options(session.search_options());

            let first = match session.find(&query, options, search.direction()) {
                Ok(found) => found,
                Err(EditError::NoMatches) => {
                    if json {
                        println!("[]");
                    } else {
                        println!("No matches found.");
                    }
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            };

            // One search; matches come back in document order
            let matches = &session.find_state().matches;
            let mut found: Vec<(Match, Location)> = matches
                .iter()
                .copied()
                .zip(locate(session.buffer(), matches))
                .collect();
            if search.direction() == Direction::Backward {
                found.reverse();
            }

            if json {
                let entries: Vec<_> = found
                    .iter()
                    .map(|(m, at)| {
                        json!({ "offset": m.offset, "length": m.length, "line": at.line, "column": at.column })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for (m, at) in &found {
                    let text = &session.buffer()[m.offset..m.end()];
                    println!("{}:{}:{}: {}", filename_for_display(&file), at.line, at.column, text);
                }
                println!("{} matches", first.total);
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Replace {
            file,
            query,
            replacement,
            nth,
            search,
            output,
        } => {
            open(&mut session, &file)?;
            let options = search.options(session.search_options());

            let replaced = match nth {
                Some(n) => {
                    if session.replace_nth(&query, &replacement, options, n)?.is_none() {
                        anyhow::bail!(
                            "--nth must be between 1 and {}",
                            session.find_state().matches.len()
                        );
                    }
                    1
                }
                None => session.replace_all(&query, &replacement, options)?,
            };

            tracing::info!(replaced, "Replaced matches in {}", file.display());
            emit(&session, &file, output, json)?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Prettify { file, output } => {
            open(&mut session, &file)?;
            if !session.prettify() {
                tracing::debug!("Nothing to prettify in {}", file.display());
            }
            emit(&session, &file, output, json)?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Stats { file } => {
            open(&mut session, &file)?;
            let stats = session.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!(
                    "Words: {} | Chars: {} | Lines: {}",
                    stats.words, stats.chars, stats.lines
                );
            }
            Ok(ExitCode::SUCCESS)
        }

        Command::Render {
            file,
            standalone,
            output,
        } => {
            open(&mut session, &file)?;
            let body = MarkdownRenderer::default().render(session.buffer())?;
            let html = if standalone {
                to_html_document(&filename_for_display(&file), &body)
            } else {
                body
            };

            match output {
                Some(out) => std::fs::write(&out, html)
                    .with_context(|| format!("Failed to write {}", out.display()))?,
                None => print!("{}", html),
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
