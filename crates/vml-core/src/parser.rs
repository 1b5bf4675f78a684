// SPDX-License-Identifier: AGPL-3.0-or-later
//! VML parser
//!
//! Line-oriented, single pass, with one line of lookahead to spot tables.
//! Malformed structure never fails the parse: anything no rule claims becomes
//! a paragraph. The only error is section nesting deeper than
//! [`ParseConfig::max_section_depth`].
//!
//! Each call builds a fresh [`Document`]; sections are parsed recursively
//! into their own document, so a child never sees its parent's metadata or
//! element list.

use crate::ast::{Alignment, AttrValue, Attributes, Document, Element};
use crate::syntax::{self, CloseOutcome, SectionMarker, SectionStack};
use crate::traits::{ConversionError, ParseConfig, Parser, Result};

/// VML parser
pub struct VmlParser;

impl VmlParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VmlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for VmlParser {
    fn parse(&self, input: &str, config: &ParseConfig) -> Result<Document> {
        let lines: Vec<&str> = input.split('\n').collect();
        let mut doc = parse_lines(&lines, 1, 0, config)?;

        if config.preserve_raw_source {
            doc.raw_source = Some(input.to_string());
        }

        tracing::debug!(
            elements = doc.elements.len(),
            metadata_keys = doc.metadata.len(),
            "Parsed VML document"
        );
        Ok(doc)
    }
}

/// Parse `lines`, the first of which is line `first_line` of the source
fn parse_lines(
    lines: &[&str],
    first_line: usize,
    depth: usize,
    config: &ParseConfig,
) -> Result<Document> {
    let mut doc = Document::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let line_no = first_line + i;

        if line.trim().is_empty() {
            i += 1;
            continue;
        }

        if syntax::is_metadata_delimiter(line) {
            i = read_metadata(lines, i, first_line, &mut doc);
            continue;
        }

        if let Some(directive) = syntax::directive(line) {
            doc.elements.push(Element::Directive {
                name: directive.name.to_string(),
                attributes: parse_attributes(directive.params),
                text: directive.text.to_string(),
                line: line_no,
            });
            i += 1;
            continue;
        }

        if let Some(SectionMarker::Start { name, params }) = syntax::section_marker(line) {
            let (section, next) = parse_section(lines, i, name, params, first_line, depth, config)?;
            doc.elements.push(section);
            i = next;
            continue;
        }

        if let Some(heading) = syntax::heading(line) {
            doc.elements.push(Element::Heading {
                level: heading.level,
                text: syntax::apply_inline(heading.text),
                line: line_no,
            });
            i += 1;
            continue;
        }

        if lines.get(i + 1).is_some_and(|next| syntax::is_table_separator(next)) {
            let (table, next) = parse_table(lines, i, line_no);
            doc.elements.push(table);
            i = next;
            continue;
        }

        doc.elements.push(Element::Paragraph {
            text: syntax::apply_inline(line),
            line: line_no,
        });
        i += 1;
    }

    Ok(doc)
}

/// Consume a metadata block opening at `start`; returns the index to resume at.
///
/// Only the first block of a document fills its metadata. A block with no
/// closing delimiter runs to the end of input.
fn read_metadata(lines: &[&str], start: usize, first_line: usize, doc: &mut Document) -> usize {
    let body_start = start + 1;
    let close = lines[body_start..]
        .iter()
        .position(|line| syntax::is_metadata_delimiter(line))
        .map(|offset| body_start + offset);

    if close.is_none() {
        tracing::warn!(
            line = first_line + start,
            "Metadata block is never closed; treating the rest of the input as metadata"
        );
    }

    let body_end = close.unwrap_or(lines.len());
    if doc.front_matter.is_none() {
        for line in &lines[body_start..body_end] {
            if let Some((key, value)) = line.split_once(':') {
                doc.metadata.insert(key.trim(), value.trim().to_string());
            }
        }
        let last = close.unwrap_or(lines.len() - 1);
        doc.front_matter = Some(first_line + start..=first_line + last);
    } else {
        tracing::debug!(line = first_line + start, "Ignoring additional metadata block");
    }

    close.map_or(lines.len(), |c| c + 1)
}

fn parse_section(
    lines: &[&str],
    start: usize,
    name: &str,
    params: &str,
    first_line: usize,
    depth: usize,
    config: &ParseConfig,
) -> Result<(Element, usize)> {
    let line_no = first_line + start;
    let child_depth = depth + 1;
    if child_depth > config.max_section_depth {
        return Err(ConversionError::NestingTooDeep {
            line: line_no,
            limit: config.max_section_depth,
        });
    }

    let mut stack = SectionStack::new();
    stack.open(name);

    // An end marker for anything but the innermost open section is
    // ordinary content here; the validator reports it.
    let mut end = start + 1;
    while end < lines.len() {
        match syntax::section_marker(lines[end]) {
            Some(SectionMarker::Start { name: inner, .. }) => stack.open(inner),
            Some(SectionMarker::End { name: closing }) => {
                if stack.close(closing) == CloseOutcome::Closed && stack.is_empty() {
                    break;
                }
            }
            None => {}
        }
        end += 1;
    }

    let interior = &lines[start + 1..end];
    let body = parse_lines(interior, line_no + 1, child_depth, config)?;

    tracing::debug!(
        section = name,
        line = line_no,
        lines = interior.len(),
        closed = end < lines.len(),
        "Collected section"
    );

    let section = Element::Section {
        name: name.to_string(),
        attributes: parse_attributes(params),
        children: body.elements,
        line: line_no,
    };
    Ok((section, end + 1))
}

fn parse_table(lines: &[&str], start: usize, line_no: usize) -> (Element, usize) {
    let headers = split_row(lines[start]);
    let alignment = split_row(lines[start + 1])
        .iter()
        .map(|cell| cell_alignment(cell))
        .collect();

    let mut rows = Vec::new();
    let mut i = start + 2;
    while i < lines.len() && syntax::is_table_row(lines[i]) {
        rows.push(split_row(lines[i]));
        i += 1;
    }

    let table = Element::Table {
        headers,
        alignment,
        rows,
        line: line_no,
    };
    (table, i)
}

fn split_row(line: &str) -> Vec<String> {
    line.trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

fn cell_alignment(cell: &str) -> Alignment {
    if cell.starts_with(':') && cell.ends_with(':') {
        Alignment::Center
    } else if cell.ends_with(':') {
        Alignment::Right
    } else {
        Alignment::Left
    }
}

/// Parse a bracketed parameter string: `key=value, flag, other="quoted"`
///
/// Bare keys become `true`. Values lose one layer of surrounding quotes.
pub fn parse_attributes(params: &str) -> Attributes {
    let mut attributes = Attributes::new();

    for token in params.split(',') {
        match token.split_once('=') {
            Some((key, value)) => {
                let key = key.trim();
                if !key.is_empty() {
                    attributes.insert(key, AttrValue::Text(unquote(value.trim()).to_string()));
                }
            }
            None => {
                let key = token.trim();
                if !key.is_empty() {
                    attributes.insert(key, AttrValue::Flag(true));
                }
            }
        }
    }

    attributes
}

fn unquote(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}
