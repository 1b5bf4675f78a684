// SPDX-License-Identifier: AGPL-3.0-or-later
//! Document tree produced by the VML parser
//!
//! Every element kind is its own variant with typed fields, so renderers
//! match exhaustively instead of looking up attribute keys at runtime.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Insertion-ordered map with string keys
///
/// Entries iterate in the order they were first inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a value, replacing an existing key in place
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Value of a bracketed parameter: `key=value` or a bare `key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Flag(bool),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Flag(_) => None,
        }
    }
}

/// Parameters of a section or directive, in written order
pub type Attributes = OrderedMap<AttrValue>;

/// Flat `key: value` pairs from the leading metadata block
pub type Metadata = OrderedMap<String>;

/// Column alignment from a table separator row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }

    /// Alignment marker for a Markdown separator cell
    pub const fn markdown_marker(&self) -> &'static str {
        match self {
            Self::Left => "---",
            Self::Center => ":---:",
            Self::Right => "---:",
        }
    }
}

/// Discriminant of [`Element`], used for fallbacks and outlines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Heading,
    Paragraph,
    Section,
    Table,
    Directive,
    List,
    Quote,
    Link,
    Image,
    CodeBlock,
    Custom,
}

impl ElementKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::Section => "section",
            Self::Table => "table",
            Self::Directive => "directive",
            Self::List => "list",
            Self::Quote => "quote",
            Self::Link => "link",
            Self::Image => "image",
            Self::CodeBlock => "code_block",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node of the document tree
///
/// `line` is the 1-based line of the source buffer the element starts on.
/// Text payloads of headings and paragraphs have already been through inline
/// substitution, so they carry pseudo-tags such as `<var>` and `<b>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    /// `#`-prefixed heading, level 1-6
    Heading { level: u8, text: String, line: usize },

    /// Any line no structural rule claimed
    Paragraph { text: String, line: usize },

    /// `:: name[params]` ... `:: /name`, contents parsed independently
    Section {
        name: String,
        attributes: Attributes,
        children: Vec<Element>,
        line: usize,
    },

    /// Pipe table with a separator row
    Table {
        headers: Vec<String>,
        alignment: Vec<Alignment>,
        rows: Vec<Vec<String>>,
        line: usize,
    },

    /// `@name[params] text`, recorded but never executed
    Directive {
        name: String,
        attributes: Attributes,
        text: String,
        line: usize,
    },

    // Declared for renderer fallbacks; the parser never produces these.
    List { content: String, line: usize },
    Quote { content: String, line: usize },
    Link { content: String, line: usize },
    Image { content: String, line: usize },
    CodeBlock { content: String, line: usize },
    Custom { content: String, line: usize },
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Heading { .. } => ElementKind::Heading,
            Element::Paragraph { .. } => ElementKind::Paragraph,
            Element::Section { .. } => ElementKind::Section,
            Element::Table { .. } => ElementKind::Table,
            Element::Directive { .. } => ElementKind::Directive,
            Element::List { .. } => ElementKind::List,
            Element::Quote { .. } => ElementKind::Quote,
            Element::Link { .. } => ElementKind::Link,
            Element::Image { .. } => ElementKind::Image,
            Element::CodeBlock { .. } => ElementKind::CodeBlock,
            Element::Custom { .. } => ElementKind::Custom,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Element::Heading { line, .. }
            | Element::Paragraph { line, .. }
            | Element::Section { line, .. }
            | Element::Table { line, .. }
            | Element::Directive { line, .. }
            | Element::List { line, .. }
            | Element::Quote { line, .. }
            | Element::Link { line, .. }
            | Element::Image { line, .. }
            | Element::CodeBlock { line, .. }
            | Element::Custom { line, .. } => *line,
        }
    }

    /// The element's primary text: heading/paragraph text, section name,
    /// directive trailing text, residual content. Tables have none.
    pub fn content(&self) -> &str {
        match self {
            Element::Heading { text, .. }
            | Element::Paragraph { text, .. }
            | Element::Directive { text, .. } => text,
            Element::Section { name, .. } => name,
            Element::Table { .. } => "",
            Element::List { content, .. }
            | Element::Quote { content, .. }
            | Element::Link { content, .. }
            | Element::Image { content, .. }
            | Element::CodeBlock { content, .. }
            | Element::Custom { content, .. } => content,
        }
    }

    /// Child elements; only sections have any
    pub fn children(&self) -> &[Element] {
        match self {
            Element::Section { children, .. } => children,
            _ => &[],
        }
    }
}

/// The parsed form of one VML buffer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub elements: Vec<Element>,
    pub metadata: Metadata,
    /// Reserved for variable resolution; never populated by parsing
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub variables: Metadata,
    /// Reserved for template resolution; never populated by parsing
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub templates: Metadata,
    /// 1-based lines (delimiters included) of the top-level metadata block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_matter: Option<RangeInclusive<usize>>,
    /// Preserved raw source (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_source: Option<String>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Title from the metadata block, if any
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").map(String::as_str)
    }

    /// Number of elements, counting section contents recursively
    pub fn element_count(&self) -> usize {
        fn count(elements: &[Element]) -> usize {
            elements.iter().map(|e| 1 + count(e.children())).sum()
        }
        count(&self.elements)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn simple_text_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 ]{0,40}".prop_map(|s| s.trim().to_string())
    }

    fn attr_value_strategy() -> impl Strategy<Value = AttrValue> {
        prop_oneof![
            simple_text_strategy().prop_map(AttrValue::Text),
            Just(AttrValue::Flag(true)),
        ]
    }

    fn leaf_strategy() -> impl Strategy<Value = Element> {
        prop_oneof![
            (1u8..=6, simple_text_strategy(), 1usize..100)
                .prop_map(|(level, text, line)| Element::Heading { level, text, line }),
            (simple_text_strategy(), 1usize..100)
                .prop_map(|(text, line)| Element::Paragraph { text, line }),
            (
                "[a-z]{1,8}",
                prop::collection::vec(("[a-z]{1,6}", attr_value_strategy()), 0..3),
                simple_text_strategy(),
            )
                .prop_map(|(name, attrs, text)| Element::Directive {
                    name,
                    attributes: attrs.into_iter().collect(),
                    text,
                    line: 1,
                }),
        ]
    }

    fn document_strategy() -> impl Strategy<Value = Document> {
        (
            prop::collection::vec(leaf_strategy(), 0..8),
            prop::collection::vec(("[a-z]{1,8}", simple_text_strategy()), 0..4),
        )
            .prop_map(|(elements, meta)| Document {
                elements,
                metadata: meta.into_iter().collect(),
                ..Document::default()
            })
    }

    proptest! {
        // Property: serde round-trip preserves the whole tree
        #[test]
        fn prop_document_serde_roundtrip(doc in document_strategy()) {
            let json = serde_json::to_string(&doc).expect("serialize");
            let back: Document = serde_json::from_str(&json).expect("deserialize");
            prop_assert_eq!(doc, back);
        }

        // Property: every kind has a non-empty fallback name
        #[test]
        fn prop_kind_names_non_empty(element in leaf_strategy()) {
            prop_assert!(!element.kind().as_str().is_empty());
        }
    }
}
