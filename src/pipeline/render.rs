//! Document rendering: [`ExtractedDocument`] → the final `data` text.
//!
//! Structured (default):
//!
//! ```text
//! Title: Hi
//!
//! Headers:
//!   Intro
//!
//! Content:
//!   Short text here that ends with period.
//! ```
//!
//! Compact keeps the same title line but lists headers and paragraphs under
//! `Content:` without indentation. In both styles the title line and the
//! `Headers:` section appear only when they have something to show; the
//! content label is always present. Lines are joined with `\n` and there is
//! no trailing newline.

use crate::config::{Labels, RenderStyle};
use crate::output::ExtractedDocument;

const INDENT: &str = "  ";

/// Render `doc` in the given style.
pub fn render_document(doc: &ExtractedDocument, style: RenderStyle, labels: &Labels) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !doc.title.is_empty() {
        lines.push(format!("{} {}", labels.title, doc.title));
        lines.push(String::new());
    }

    match style {
        RenderStyle::Structured => {
            if !doc.headers.is_empty() {
                lines.push(labels.headers.clone());
                lines.extend(doc.headers.iter().map(|h| format!("{INDENT}{h}")));
                lines.push(String::new());
            }
            lines.push(labels.content.clone());
            lines.extend(doc.body_paragraphs.iter().map(|p| format!("{INDENT}{p}")));
        }
        RenderStyle::Compact => {
            lines.push(labels.content.clone());
            lines.extend(doc.headers.iter().cloned());
            lines.extend(doc.body_paragraphs.iter().cloned());
        }
    }

    lines.join("\n")
}
