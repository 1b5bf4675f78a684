// SPDX-License-Identifier: AGPL-3.0-or-later
//! HTML renderer
//!
//! Text payloads already carry the pseudo-tags from inline substitution and
//! are written out as-is. Directives become comments; they are never run.

use crate::ast::{Alignment, Document, Element};
use crate::traits::{OutputFormat, RenderConfig, Renderer, Result};

/// HTML renderer
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HtmlRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Html
    }

    fn render(&self, doc: &Document, config: &RenderConfig) -> Result<String> {
        Ok(render_document(doc, config))
    }
}

pub(crate) fn render_document(doc: &Document, config: &RenderConfig) -> String {
    let mut output = String::new();

    if config.standalone {
        output.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n");
        if let Some(title) = doc.title() {
            output.push_str(&format!("<title>{}</title>\n", title));
        }
        output.push_str("</head>\n<body>\n");
    }

    for element in &doc.elements {
        render_element(&mut output, element);
    }

    if config.standalone {
        output.push_str("\n</body>\n</html>");
    }

    output
}

fn render_element(output: &mut String, element: &Element) {
    match element {
        Element::Heading { level, text, .. } => {
            output.push_str(&format!("<h{level}>{text}</h{level}>\n"));
        }

        Element::Paragraph { text, .. } => {
            output.push_str(&format!("<p>{}</p>\n", text));
        }

        Element::Section { name, children, .. } => {
            output.push_str(&format!("<section class=\"{}\">\n", name));
            for child in children {
                render_element(output, child);
            }
            output.push_str("</section>\n");
        }

        Element::Table {
            headers,
            alignment,
            rows,
            ..
        } => {
            output.push_str("<table>\n<thead>\n<tr>\n");
            for (i, header) in headers.iter().enumerate() {
                output.push_str(&format!(
                    "<th style=\"text-align: {}\">{}</th>\n",
                    column_alignment(alignment, i),
                    header
                ));
            }
            output.push_str("</tr>\n</thead>\n<tbody>\n");
            for row in rows {
                output.push_str("<tr>\n");
                for (i, cell) in row.iter().enumerate() {
                    output.push_str(&format!(
                        "<td style=\"text-align: {}\">{}</td>\n",
                        column_alignment(alignment, i),
                        cell
                    ));
                }
                output.push_str("</tr>\n");
            }
            output.push_str("</tbody>\n</table>\n");
        }

        Element::Directive { name, text, .. } => {
            if name == "include" {
                output.push_str(&format!("<!-- Include: {} -->\n", text));
            } else {
                output.push_str(&format!("<!-- Directive: {} -->\n", name));
            }
        }

        Element::List { .. }
        | Element::Quote { .. }
        | Element::Link { .. }
        | Element::Image { .. }
        | Element::CodeBlock { .. }
        | Element::Custom { .. } => {
            output.push_str(&format!(
                "<!-- Unsupported element type: {} -->\n",
                element.kind()
            ));
        }
    }
}

/// Columns past the end of the alignment row fall back to left
fn column_alignment(alignment: &[Alignment], column: usize) -> &'static str {
    alignment.get(column).unwrap_or(&Alignment::Left).as_str()
}
