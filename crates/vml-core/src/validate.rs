// SPDX-License-Identifier: AGPL-3.0-or-later
//! Structural validation
//!
//! Two checks that do not trust each other: a full parse, whose failure ends
//! validation with a single `Parser error` diagnostic, and a line scan over
//! the raw text. The scan runs section markers through the same
//! [`SectionStack`] the parser uses and counts custom markup delimiters per
//! line. A successful parse says nothing about structure: the parser quietly
//! absorbs unbalanced markers that the scan reports.

use crate::parser::VmlParser;
use crate::syntax::{self, CloseOutcome, CustomMarkup, SectionMarker, SectionStack, CUSTOM_MARKUP};
use crate::traits::{ParseConfig, Parser};
use serde::Serialize;
use std::fmt;

/// One validation finding; `Display` gives the diagnostic text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The parse itself failed
    ParserError { message: String },

    /// An end marker with nothing open, or not naming the innermost section
    UnmatchedClose { line: usize, name: String },

    /// Open and close delimiters of one markup type don't balance on a line
    UnclosedMarkup { line: usize, markup: &'static str },

    /// Sections still open at end of input, outermost first
    UnclosedSections { names: Vec<String> },
}

impl Diagnostic {
    /// 1-based line the finding is tied to, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            Diagnostic::UnmatchedClose { line, .. } | Diagnostic::UnclosedMarkup { line, .. } => {
                Some(*line)
            }
            Diagnostic::ParserError { .. } | Diagnostic::UnclosedSections { .. } => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ParserError { message } => write!(f, "Parser error: {message}"),
            Diagnostic::UnmatchedClose { line, name } => {
                write!(f, "Line {line}: Unmatched section closing tag: {name}")
            }
            Diagnostic::UnclosedMarkup { line, markup } => {
                write!(f, "Line {line}: Unclosed {markup} markup")
            }
            Diagnostic::UnclosedSections { names } => {
                write!(f, "Unclosed sections: {}", names.join(", "))
            }
        }
    }
}

/// Outcome of [`validate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// Ordered by line, whole-document findings last
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            is_valid: diagnostics.is_empty(),
            diagnostics,
        }
    }

    /// Diagnostic texts, in order
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(ToString::to_string).collect()
    }

    /// The `(is_valid, messages)` pair
    pub fn into_pair(self) -> (bool, Vec<String>) {
        let messages = self.messages();
        (self.is_valid, messages)
    }
}

/// Validate VML source with the default parse configuration
pub fn validate(text: &str) -> ValidationReport {
    validate_with(text, &ParseConfig::default())
}

pub fn validate_with(text: &str, config: &ParseConfig) -> ValidationReport {
    if let Err(err) = VmlParser::new().parse(text, config) {
        tracing::debug!(error = %err, "Validation stopped by parser failure");
        return ValidationReport::from_diagnostics(vec![Diagnostic::ParserError {
            message: err.to_string(),
        }]);
    }

    let diagnostics = scan(text);
    tracing::debug!(diagnostics = diagnostics.len(), "Validated VML document");
    ValidationReport::from_diagnostics(diagnostics)
}

/// Line-by-line structural scan over the raw text
fn scan(text: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut sections = SectionStack::new();

    for (index, line) in text.split('\n').enumerate() {
        let line_no = index + 1;

        match syntax::section_marker(line) {
            Some(SectionMarker::Start { name, .. }) => sections.open(name),
            Some(SectionMarker::End { name }) => match sections.close(name) {
                CloseOutcome::Closed => {}
                CloseOutcome::Mismatched { .. } | CloseOutcome::Unopened => {
                    tracing::trace!(line = line_no, section = name, "Unmatched closing tag");
                    diagnostics.push(Diagnostic::UnmatchedClose {
                        line: line_no,
                        name: name.to_string(),
                    });
                }
            },
            None => {}
        }

        for markup in CUSTOM_MARKUP.iter().filter(|m| is_unbalanced(line, m)) {
            tracing::trace!(line = line_no, markup = markup.name, "Unclosed markup");
            diagnostics.push(Diagnostic::UnclosedMarkup {
                line: line_no,
                markup: markup.name,
            });
        }
    }

    if !sections.is_empty() {
        diagnostics.push(Diagnostic::UnclosedSections {
            names: sections.into_unclosed(),
        });
    }

    diagnostics
}

/// Count-based balance check for one markup type on one line.
///
/// A heuristic: equal counts pass even when spans are crossed. A pair that
/// uses one string for both ends is unbalanced when its count is odd.
fn is_unbalanced(line: &str, markup: &CustomMarkup) -> bool {
    let opens = line.matches(markup.open).count();
    if markup.is_symmetric() {
        opens % 2 != 0
    } else {
        opens != line.matches(markup.close).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_well_formed_document_is_valid() {
        let report = validate(
            "---\ntitle: Ok\n---\n# Head\n:: outer[x=1]\n:: inner\n!!hey!! <~ctx~>\n:: /inner\n:: /outer",
        );
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
        assert!(report.is_valid);
    }

    #[test]
    fn test_mismatched_close_and_unclosed_section() {
        let (is_valid, messages) = validate(":: foo\ncontent\n:: /bar").into_pair();
        assert!(!is_valid);
        assert_eq!(
            messages,
            vec![
                "Line 3: Unmatched section closing tag: bar".to_string(),
                "Unclosed sections: foo".to_string(),
            ]
        );
    }

    #[test]
    fn test_close_without_open() {
        let report = validate("text\n:: /ghost");
        assert_eq!(
            report.diagnostics,
            vec![Diagnostic::UnmatchedClose {
                line: 2,
                name: "ghost".into()
            }]
        );
        assert_eq!(report.diagnostics[0].line(), Some(2));
    }

    #[test]
    fn test_unclosed_sections_listed_outermost_first() {
        let report = validate(":: a\n:: b\n:: c\n:: /c");
        assert_eq!(report.messages(), vec!["Unclosed sections: a, b".to_string()]);
    }

    #[test]
    fn test_unterminated_emphasis() {
        let report = validate("!!urgent");
        assert_eq!(report.messages(), vec!["Line 1: Unclosed emphasis markup".to_string()]);

        assert!(validate("!!urgent!!").is_valid);
    }

    #[test]
    fn test_each_markup_type_is_checked() {
        let report = validate("ok\n<~open\n(*open\n/!open\n/+open\n@[open");
        assert_eq!(
            report.messages(),
            vec![
                "Line 2: Unclosed context markup".to_string(),
                "Line 3: Unclosed note markup".to_string(),
                "Line 4: Unclosed warning markup".to_string(),
                "Line 5: Unclosed success markup".to_string(),
                "Line 6: Unclosed code_ref markup".to_string(),
            ]
        );
    }

    #[test]
    fn test_count_heuristic_accepts_crossed_spans() {
        // balanced counts, wrong order
        assert!(validate("~>backwards<~").is_valid);
    }

    #[test]
    fn test_diagnostics_ordered_by_line() {
        let report = validate(":: /x\n!!a\n:: y\n(*b");
        assert_eq!(
            report.messages(),
            vec![
                "Line 1: Unmatched section closing tag: x".to_string(),
                "Line 2: Unclosed emphasis markup".to_string(),
                "Line 4: Unclosed note markup".to_string(),
                "Unclosed sections: y".to_string(),
            ]
        );
    }

    #[test]
    fn test_parser_failure_short_circuits() {
        let config = ParseConfig {
            max_section_depth: 2,
            ..ParseConfig::default()
        };
        let report = validate_with(":: a\n:: b\n:: c\n!!x", &config);
        assert!(!report.is_valid);
        assert_eq!(
            report.messages(),
            vec!["Parser error: Section nesting exceeds 2 levels at line 3".to_string()]
        );
    }

    #[test]
    fn test_parse_success_does_not_imply_valid() {
        let input = ":: foo\ncontent\n:: /bar";
        assert!(VmlParser::new()
            .parse(input, &ParseConfig::default())
            .is_ok());
        assert!(!validate(input).is_valid);
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(validate("!!x")).unwrap();
        assert_eq!(json["is_valid"], false);
        assert_eq!(json["diagnostics"][0]["kind"], "unclosed_markup");
        assert_eq!(json["diagnostics"][0]["markup"], "emphasis");
    }
}
