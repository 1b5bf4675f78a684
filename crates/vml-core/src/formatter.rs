// SPDX-License-Identifier: AGPL-3.0-or-later
//! Best-effort source formatter
//!
//! A light touch-up of the original text, not a re-render of the tree: the
//! parse only confirms the input is processable and supplies the metadata.
//! Input that fails to parse comes back unchanged.

use crate::parser::VmlParser;
use crate::syntax;
use crate::traits::{ParseConfig, Parser};
use crate::validate::validate_with;

/// Format VML source with the default parse configuration
pub fn format(input: &str) -> String {
    format_with(input, &ParseConfig::default())
}

/// Format VML source.
///
/// - the parsed metadata is emitted first as a `---` block followed by one
///   blank line; every `---` delimiter line of the source is dropped
/// - every heading line is trimmed and followed by a blank line
/// - all other lines pass through verbatim
pub fn format_with(input: &str, config: &ParseConfig) -> String {
    let doc = match VmlParser::new().parse(input, config) {
        Ok(doc) => doc,
        Err(err) => {
            tracing::warn!(error = %err, "Formatting skipped, returning input unchanged");
            return input.to_string();
        }
    };

    let lines: Vec<&str> = input.split('\n').collect();
    let mut formatted: Vec<String> = Vec::with_capacity(lines.len() + doc.metadata.len() + 3);

    if !doc.metadata.is_empty() {
        formatted.push("---".to_string());
        for (key, value) in doc.metadata.iter() {
            formatted.push(format!("{}: {}", key, value));
        }
        formatted.push("---".to_string());
        formatted.push(String::new());
    }

    for line in lines {
        if syntax::is_metadata_delimiter(line) {
            continue;
        }

        if syntax::heading(line).is_some() {
            formatted.push(line.trim_end().to_string());
            formatted.push(String::new());
        } else {
            formatted.push(line.to_string());
        }
    }

    tracing::debug!(lines = formatted.len(), "Formatted VML document");
    formatted.join("\n")
}

/// Format, prefixing one comment line per validation diagnostic when the
/// source does not validate
pub fn format_with_diagnostics(input: &str) -> String {
    let config = ParseConfig::default();
    let report = validate_with(input, &config);
    let formatted = format_with(input, &config);

    if report.is_valid {
        return formatted;
    }

    let comments: Vec<String> = report
        .diagnostics
        .iter()
        .map(|d| format!("<!-- Validation Error: {} -->", d))
        .collect();
    format!("{}\n\n{}", comments.join("\n"), formatted)
}
