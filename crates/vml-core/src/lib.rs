// SPDX-License-Identifier: AGPL-3.0-or-later
//! VML Core - Versatile Markup Language engine
//!
//! This crate provides:
//! - A line-oriented parser from VML source to a document tree
//! - HTML and Markdown renderers behind a common `Renderer` trait
//! - A structural validator and a best-effort source formatter
//! - Editor support: syntax highlight spans and a document outline
//! - C FFI exports (feature `ffi`)
//!
//! ```
//! let doc = vml_core::parse("---\ntitle: Notes\n---\n# Hello ${name}").unwrap();
//! assert_eq!(doc.title(), Some("Notes"));
//! assert_eq!(vml_core::to_markdown(&doc), "---\ntitle: Notes\n---\n\n# Hello <var>name</var>\n\n");
//! ```

pub mod ast;
pub mod config;
pub mod formats;
pub mod formatter;
pub mod highlight;
pub mod language;
pub mod outline;
pub mod parser;
pub mod syntax;
pub mod traits;
pub mod validate;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use ast::{Alignment, AttrValue, Attributes, Document, Element, ElementKind, Metadata};
pub use config::VmlConfig;
pub use formats::{HtmlRenderer, MarkdownRenderer};
pub use formatter::{format_with, format_with_diagnostics};
pub use highlight::{highlight, HighlightSpan, TokenClass};
pub use language::{language_info, LanguageInfo, EXAMPLE_SOURCE};
pub use outline::{outline, OutlineNode};
pub use parser::VmlParser;
pub use traits::{
    convert, renderer_for, ConversionError, OutputFormat, ParseConfig, Parser, RenderConfig,
    Renderer, Result,
};
pub use validate::{validate_with, Diagnostic, ValidationReport};

/// Parse VML source with the default configuration
pub fn parse(text: &str) -> Result<Document> {
    VmlParser::new().parse(text, &ParseConfig::default())
}

/// Render a document as a standalone HTML page
pub fn to_html(doc: &Document) -> String {
    formats::html::render_document(doc, &RenderConfig::default())
}

/// Render a document as Markdown with a frontmatter block
pub fn to_markdown(doc: &Document) -> String {
    formats::markdown::render_document(doc, &RenderConfig::default())
}

/// Validate VML source: `(is_valid, diagnostics)`
pub fn validate(text: &str) -> (bool, Vec<String>) {
    validate::validate(text).into_pair()
}

/// Format VML source; input that cannot be parsed is returned unchanged
pub fn format(text: &str) -> String {
    formatter::format(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_crate_root_operations() {
        let doc = parse("# Title\n\n!!Hi!! there").unwrap();
        assert_eq!(doc.element_count(), 2);

        let html = to_html(&doc);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<p><emphasis>Hi</emphasis> there</p>"));

        assert_eq!(to_markdown(&doc), "# Title\n\n<emphasis>Hi</emphasis> there\n\n");
        assert_eq!(format("# Title\nbody"), "# Title\n\nbody");
    }

    #[test]
    fn test_validate_pair() {
        assert_eq!(validate(EXAMPLE_SOURCE), (true, vec![]));
        assert_eq!(
            validate(":: foo\ncontent\n:: /bar"),
            (
                false,
                vec![
                    "Line 3: Unmatched section closing tag: bar".to_string(),
                    "Unclosed sections: foo".to_string(),
                ]
            )
        );
    }
}
