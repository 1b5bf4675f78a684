// SPDX-License-Identifier: AGPL-3.0-or-later
//! Markdown renderer
//!
//! Lossy: sections and directives have no Markdown counterpart and
//! come out as comment lines. Only the `<b>`, `<i>` and `<code>` pseudo-tags
//! of paragraphs are turned back into Markdown punctuation.

use crate::ast::{Document, Element};
use crate::syntax;
use crate::traits::{OutputFormat, RenderConfig, Renderer, Result};

/// Markdown renderer
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for MarkdownRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }

    fn render(&self, doc: &Document, config: &RenderConfig) -> Result<String> {
        Ok(render_document(doc, config))
    }
}

pub(crate) fn render_document(doc: &Document, config: &RenderConfig) -> String {
    let mut output = String::new();

    if config.front_matter && !doc.metadata.is_empty() {
        output.push_str("---\n");
        for (key, value) in doc.metadata.iter() {
            output.push_str(&format!("{}: {}\n", key, value));
        }
        output.push_str("---\n\n");
    }

    for element in &doc.elements {
        render_element(&mut output, element);
    }

    output
}

fn render_element(output: &mut String, element: &Element) {
    match element {
        Element::Heading { level, text, .. } => {
            output.push_str(&"#".repeat(*level as usize));
            output.push(' ');
            output.push_str(text);
            output.push_str("\n\n");
        }

        Element::Paragraph { text, .. } => {
            output.push_str(&syntax::restore_markdown(text));
            output.push_str("\n\n");
        }

        Element::Table {
            headers,
            alignment,
            rows,
            ..
        } => {
            output.push_str(&format!("| {} |\n", headers.join(" | ")));
            let markers: Vec<&str> = alignment.iter().map(|a| a.markdown_marker()).collect();
            output.push_str(&format!("| {} |\n", markers.join(" | ")));
            for row in rows {
                output.push_str(&format!("| {} |\n", row.join(" | ")));
            }
            output.push('\n');
        }

        Element::Section { .. }
        | Element::Directive { .. }
        | Element::List { .. }
        | Element::Quote { .. }
        | Element::Link { .. }
        | Element::Image { .. }
        | Element::CodeBlock { .. }
        | Element::Custom { .. } => {
            output.push_str(&format!(
                "<!-- {}: {} -->\n\n",
                element.kind(),
                element.content()
            ));
        }
    }
}
