// SPDX-License-Identifier: AGPL-3.0-or-later
//! VML syntax rule set
//!
//! The one table of pattern rules consulted by the parser, the validator,
//! the formatter and the highlighter:
//! - line-anchored structural rules (heading, directive, section start/end,
//!   metadata delimiter, table separator/row)
//! - the ordered inline substitution cascade
//! - the six custom markup delimiter pairs
//! - [`SectionStack`], the single nesting algorithm for section markers

use regex::{Captures, Regex};
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@(\w+)(?:\[([^\]]*)\])?\s*(.*)$").unwrap());

static SECTION_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^::\s*(\w+)(?:\[([^\]]*)\])?\s*$").unwrap());

static SECTION_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^::\s*/(\w+)\s*$").unwrap());

static METADATA_DELIMITER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^---\s*$").unwrap());

static TABLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|[\s\-:|]+\|$").unwrap());

static TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\|(.+)\|$").unwrap());

/// Custom inline markup: an open/close delimiter pair and the pseudo-tag it
/// becomes during inline substitution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CustomMarkup {
    pub name: &'static str,
    pub open: &'static str,
    pub close: &'static str,
}

impl CustomMarkup {
    /// Whether the same string opens and closes a span
    pub fn is_symmetric(&self) -> bool {
        self.open == self.close
    }
}

/// Custom markup pairs, in substitution order
pub const CUSTOM_MARKUP: [CustomMarkup; 6] = [
    CustomMarkup {
        name: "emphasis",
        open: "!!",
        close: "!!",
    },
    CustomMarkup {
        name: "context",
        open: "<~",
        close: "~>",
    },
    CustomMarkup {
        name: "note",
        open: "(*",
        close: "*)",
    },
    CustomMarkup {
        name: "warning",
        open: "/!",
        close: "!/",
    },
    CustomMarkup {
        name: "success",
        open: "/+",
        close: "+/",
    },
    CustomMarkup {
        name: "code_ref",
        open: "@[",
        close: "]@",
    },
];

/// What an inline rule stands for; the highlighter classifies by this
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineRuleKind {
    Variable,
    Template,
    Annotation,
    Markup(CustomMarkup),
    Bold,
    Italic,
    Code,
}

/// One step of the inline substitution cascade
#[derive(Debug)]
pub struct InlineRule {
    pub kind: InlineRuleKind,
    pub pattern: Regex,
    replacement: String,
}

impl InlineRule {
    fn new(kind: InlineRuleKind, pattern: &str, tag: &str) -> Self {
        Self {
            kind,
            pattern: Regex::new(pattern).unwrap(),
            replacement: format!("<{tag}>${{1}}</{tag}>"),
        }
    }

    fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, self.replacement.as_str())
            .into_owned()
    }
}

/// The inline cascade. Order is part of the language: each rule rewrites the
/// output of the ones before it. Variables, templates, annotations, the
/// custom pairs in table order, then bold, italic, inline code.
pub static INLINE_RULES: LazyLock<Vec<InlineRule>> = LazyLock::new(|| {
    let mut rules = vec![
        InlineRule::new(InlineRuleKind::Variable, r"\$\{([^}]+)\}", "var"),
        InlineRule::new(InlineRuleKind::Template, r"%\{([^}]+)\}", "template"),
        InlineRule::new(InlineRuleKind::Annotation, r"\[\[([^\]]+)\]\]", "annotation"),
    ];
    rules.extend(CUSTOM_MARKUP.iter().map(|markup| {
        let pattern = format!(
            "{}(.+?){}",
            regex::escape(markup.open),
            regex::escape(markup.close)
        );
        InlineRule::new(InlineRuleKind::Markup(*markup), &pattern, markup.name)
    }));
    rules.extend([
        InlineRule::new(InlineRuleKind::Bold, r"\*\*(.+?)\*\*", "b"),
        InlineRule::new(InlineRuleKind::Italic, r"\*(.+?)\*", "i"),
        InlineRule::new(InlineRuleKind::Code, r"`(.+?)`", "code"),
    ]);
    rules
});

/// Pseudo-tags mapped back to Markdown punctuation, in order
static MARKDOWN_RESTORE: LazyLock<[(Regex, &'static str); 3]> = LazyLock::new(|| {
    [
        (Regex::new(r"<b>(.+?)</b>").unwrap(), "**${1}**"),
        (Regex::new(r"<i>(.+?)</i>").unwrap(), "*${1}*"),
        (Regex::new(r"<code>(.+?)</code>").unwrap(), "`${1}`"),
    ]
});

/// Run the inline substitution cascade over one line of text
pub fn apply_inline(text: &str) -> String {
    INLINE_RULES
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc))
}

/// Turn `<b>`, `<i>` and `<code>` pseudo-tags back into Markdown
pub fn restore_markdown(text: &str) -> String {
    MARKDOWN_RESTORE
        .iter()
        .fold(text.to_string(), |acc, (pattern, replacement)| {
            pattern.replace_all(&acc, *replacement).into_owned()
        })
}

/// A matched heading line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingLine<'a> {
    pub level: u8,
    pub text: &'a str,
}

pub fn heading(line: &str) -> Option<HeadingLine<'_>> {
    HEADING.captures(line).map(|caps| HeadingLine {
        level: caps[1].len() as u8,
        text: group(&caps, 2),
    })
}

/// A matched directive line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveLine<'a> {
    pub name: &'a str,
    pub params: &'a str,
    pub text: &'a str,
    /// Byte offset where `@name[params]` ends
    pub head_end: usize,
}

pub fn directive(line: &str) -> Option<DirectiveLine<'_>> {
    DIRECTIVE.captures(line).map(|caps| {
        let head_end = match (caps.get(1), caps.get(2)) {
            (_, Some(params)) => params.end() + 1,
            (Some(name), None) => name.end(),
            (None, None) => 0,
        };
        DirectiveLine {
            name: group(&caps, 1),
            params: group(&caps, 2),
            text: group(&caps, 3),
            head_end,
        }
    })
}

/// A section start or end marker line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionMarker<'a> {
    Start { name: &'a str, params: &'a str },
    End { name: &'a str },
}

pub fn section_marker(line: &str) -> Option<SectionMarker<'_>> {
    if let Some(caps) = SECTION_START.captures(line) {
        return Some(SectionMarker::Start {
            name: group(&caps, 1),
            params: group(&caps, 2),
        });
    }
    SECTION_END.captures(line).map(|caps| SectionMarker::End {
        name: group(&caps, 1),
    })
}

pub fn is_metadata_delimiter(line: &str) -> bool {
    METADATA_DELIMITER.is_match(line)
}

pub fn is_table_separator(line: &str) -> bool {
    TABLE_SEPARATOR.is_match(line)
}

pub fn is_table_row(line: &str) -> bool {
    TABLE_ROW.is_match(line)
}

fn group<'a>(caps: &Captures<'a>, index: usize) -> &'a str {
    caps.get(index).map_or("", |m| m.as_str())
}

/// Result of offering an end marker to a [`SectionStack`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Closed the innermost open section
    Closed,
    /// Names a section other than the innermost open one
    Mismatched { expected: String },
    /// Nothing is open
    Unopened,
}

/// Stack of open section names
///
/// Start markers push; an end marker pops only when it names the innermost
/// open section. The parser uses it to find where a section ends, the
/// validator to report unbalanced markers.
#[derive(Debug, Clone, Default)]
pub struct SectionStack {
    open: Vec<String>,
}

impl SectionStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, name: &str) {
        self.open.push(name.to_string());
    }

    pub fn close(&mut self, name: &str) -> CloseOutcome {
        match self.open.last() {
            None => CloseOutcome::Unopened,
            Some(top) if top == name => {
                self.open.pop();
                CloseOutcome::Closed
            }
            Some(top) => CloseOutcome::Mismatched {
                expected: top.clone(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    /// Names still open, outermost first
    pub fn into_unclosed(self) -> Vec<String> {
        self.open
    }
}
