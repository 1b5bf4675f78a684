// SPDX-License-Identifier: AGPL-3.0-or-later
//! Document outline for structure views

use crate::ast::{Document, Element};
use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// Longest text shown in a heading or residual element label, in grapheme
/// clusters
pub const LABEL_TEXT_LIMIT: usize = 50;

/// One node of the structure tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineNode {
    pub label: String,
    /// 1-based source line, when the node maps to one
    pub line: Option<usize>,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    fn leaf(label: String, line: Option<usize>) -> Self {
        Self {
            label,
            line,
            children: Vec::new(),
        }
    }
}

/// Build the outline of a parsed document.
///
/// A `Metadata` node listing `key: value` pairs comes first when the
/// document has metadata, followed by one node per element. Sections nest
/// their children.
pub fn outline(doc: &Document) -> Vec<OutlineNode> {
    let mut nodes = Vec::with_capacity(doc.elements.len() + 1);

    if !doc.metadata.is_empty() {
        let children = doc
            .metadata
            .iter()
            .map(|(key, value)| OutlineNode::leaf(format!("{}: {}", key, value), None))
            .collect();
        nodes.push(OutlineNode {
            label: "Metadata".to_string(),
            line: doc.front_matter.as_ref().map(|range| *range.start()),
            children,
        });
    }

    nodes.extend(doc.elements.iter().map(element_node));
    nodes
}

fn element_node(element: &Element) -> OutlineNode {
    let label = match element {
        Element::Heading { level, text, .. } => format!("H{}: {}", level, truncate(text)),
        Element::Section { name, .. } => format!("Section: {}", name),
        Element::Directive { name, .. } => format!("@{}", name),
        other => format!("{}: {}", other.kind(), truncate(other.content())),
    };

    OutlineNode {
        label,
        line: Some(element.line()),
        children: element.children().iter().map(element_node).collect(),
    }
}

fn truncate(text: &str) -> &str {
    match text.grapheme_indices(true).nth(LABEL_TEXT_LIMIT) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
