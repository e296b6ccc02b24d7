//! Markdown to HTML rendering using pulldown-cmark
//!
//! Rendering is a collaborator behind the [`Renderer`] trait; the editing core
//! hands it buffer text and never inspects the result.

use pulldown_cmark::{html, Options, Parser};
use thiserror::Error;

/// Errors a renderer may report
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("document too large to render ({size} bytes, max {max})")]
    TooLarge { size: usize, max: usize },
}

/// Turns buffer text into rendered markup
pub trait Renderer {
    fn render(&self, source: &str) -> Result<String, RenderError>;
}

/// CommonMark renderer with GitHub-style extensions
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
    max_size: usize,
}

/// Maximum document size rendered (matches the file open limit)
pub const MAX_RENDER_SIZE: usize = 50 * 1024 * 1024;

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
            max_size: MAX_RENDER_SIZE,
        }
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, source: &str) -> Result<String, RenderError> {
        if source.len() > self.max_size {
            return Err(RenderError::TooLarge {
                size: source.len(),
                max: self.max_size,
            });
        }

        let parser = Parser::new_ext(source, self.options);
        let mut html_output = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        Ok(html_output)
    }
}

/// Wrap a rendered fragment into a standalone HTML document
pub fn to_html_document(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{}</title>
</head>
<body>
{}
</body>
</html>"#,
        escape_text(title),
        body
    )
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_heading_and_task_list() {
        let html = MarkdownRenderer::default()
            .render("# Title\n\n- [x] done\n")
            .unwrap();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn test_render_table() {
        let html = MarkdownRenderer::default()
            .render("| a | b |\n|---|---|\n| 1 | 2 |\n")
            .unwrap();
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_document_wrapper_escapes_title() {
        let doc = to_html_document("<README>", "<p>x</p>");
        assert!(doc.contains("<title>&lt;README&gt;</title>"));
        assert!(doc.contains("<p>x</p>"));
    }
}
