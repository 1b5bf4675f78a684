// SPDX-License-Identifier: AGPL-3.0-or-later
//! Token spans for editor syntax colouring
//!
//! Works on raw source, not on a parsed document: every line is classified by
//! the same rules the parser uses, and inline spans are found with the
//! cascade's own patterns. Bold, italic and inline code are left to the
//! editor's Markdown mode and are not reported.

use crate::syntax::{self, InlineRuleKind, SectionMarker, INLINE_RULES};
use serde::Serialize;
use std::ops::Range;

/// What a highlighted span is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenClass {
    Heading,
    Directive,
    SectionStart,
    SectionEnd,
    MetadataDelimiter,
    Variable,
    Template,
    Annotation,
    /// One of the custom markup pairs, by name (`emphasis`, `code_ref`, ...)
    Markup(&'static str),
}

impl TokenClass {
    /// CSS class name an editor theme can key on
    pub fn css_class(&self) -> String {
        match self {
            TokenClass::Heading => "vml-heading".to_string(),
            TokenClass::Directive => "vml-directive".to_string(),
            TokenClass::SectionStart => "vml-section-start".to_string(),
            TokenClass::SectionEnd => "vml-section-end".to_string(),
            TokenClass::MetadataDelimiter => "vml-metadata".to_string(),
            TokenClass::Variable => "vml-variable".to_string(),
            TokenClass::Template => "vml-template".to_string(),
            TokenClass::Annotation => "vml-annotation".to_string(),
            TokenClass::Markup(name) => format!("vml-{}", name.replace('_', "-")),
        }
    }
}

/// A classified byte range of the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub class: TokenClass,
    pub range: Range<usize>,
}

/// Highlight spans over `text`, sorted by start offset.
///
/// Offsets are byte offsets into `text`. A line-level span (heading, section
/// marker) comes before the inline spans that start inside it.
pub fn highlight(text: &str) -> Vec<HighlightSpan> {
    let mut spans = Vec::new();
    let mut offset = 0;

    for line in text.split('\n') {
        line_spans(line, offset, &mut spans);
        offset += line.len() + 1;
    }

    spans.sort_by_key(|span| span.range.start);
    spans
}

fn line_spans(line: &str, offset: usize, spans: &mut Vec<HighlightSpan>) {
    let mut push = |class: TokenClass, range: Range<usize>| {
        spans.push(HighlightSpan {
            class,
            range: offset + range.start..offset + range.end,
        });
    };

    if syntax::is_metadata_delimiter(line) {
        push(TokenClass::MetadataDelimiter, 0..line.trim_end().len());
        return;
    }

    if let Some(directive) = syntax::directive(line) {
        push(TokenClass::Directive, 0..directive.head_end);
    } else if let Some(marker) = syntax::section_marker(line) {
        let class = match marker {
            SectionMarker::Start { .. } => TokenClass::SectionStart,
            SectionMarker::End { .. } => TokenClass::SectionEnd,
        };
        push(class, 0..line.trim_end().len());
        return;
    } else if syntax::heading(line).is_some() {
        push(TokenClass::Heading, 0..line.len());
    }

    for rule in INLINE_RULES.iter() {
        let class = match rule.kind {
            InlineRuleKind::Variable => TokenClass::Variable,
            InlineRuleKind::Template => TokenClass::Template,
            InlineRuleKind::Annotation => TokenClass::Annotation,
            InlineRuleKind::Markup(markup) => TokenClass::Markup(markup.name),
            InlineRuleKind::Bold | InlineRuleKind::Italic | InlineRuleKind::Code => continue,
        };
        for found in rule.pattern.find_iter(line) {
            push(class, found.range());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn span(class: TokenClass, range: Range<usize>) -> HighlightSpan {
        HighlightSpan { class, range }
    }

    #[test]
    fn test_heading_with_inline_variable() {
        assert_eq!(
            highlight("# Title ${x}"),
            vec![
                span(TokenClass::Heading, 0..12),
                span(TokenClass::Variable, 8..12),
            ]
        );
    }

    #[test]
    fn test_directive_head_only() {
        assert_eq!(
            highlight("intro\n@include[once] file.vml"),
            vec![span(TokenClass::Directive, 6..20)]
        );
        assert_eq!(highlight("@toc"), vec![span(TokenClass::Directive, 0..4)]);
    }

    #[test]
    fn test_section_markers_and_delimiters() {
        assert_eq!(
            highlight(":: box[a=1]  \n:: /box\n---"),
            vec![
                span(TokenClass::SectionStart, 0..11),
                span(TokenClass::SectionEnd, 14..21),
                span(TokenClass::MetadataDelimiter, 22..25),
            ]
        );
    }

    #[test]
    fn test_custom_markup_spans() {
        assert_eq!(
            highlight("a !!b!! <~c~> %{t} [[n]] @[f]@"),
            vec![
                span(TokenClass::Markup("emphasis"), 2..7),
                span(TokenClass::Markup("context"), 8..13),
                span(TokenClass::Template, 14..18),
                span(TokenClass::Annotation, 19..24),
                span(TokenClass::Markup("code_ref"), 25..30),
            ]
        );
    }

    #[test]
    fn test_markdown_inline_not_reported() {
        assert!(highlight("plain **bold** *it* `code`").is_empty());
    }

    #[test]
    fn test_multibyte_offsets() {
        let text = "é\n${v}";
        let spans = highlight(text);
        assert_eq!(spans, vec![span(TokenClass::Variable, 3..7)]);
        assert_eq!(&text[spans[0].range.clone()], "${v}");
    }

    #[test]
    fn test_css_class() {
        assert_eq!(TokenClass::Markup("code_ref").css_class(), "vml-code-ref");
        assert_eq!(TokenClass::SectionEnd.css_class(), "vml-section-end");
    }
}
