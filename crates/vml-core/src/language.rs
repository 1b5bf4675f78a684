// SPDX-License-Identifier: AGPL-3.0-or-later
//! Language registration data for editors and converters

use serde::Serialize;

/// Static description of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub name: &'static str,
    pub full_name: &'static str,
    /// File extensions, leading dot included
    pub extensions: &'static [&'static str],
    pub description: &'static str,
}

impl LanguageInfo {
    /// Whether `path` ends with one of the language's extensions
    /// (ASCII case-insensitive)
    pub fn matches_path(&self, path: &str) -> bool {
        let lower = path.to_ascii_lowercase();
        self.extensions.iter().any(|ext| lower.ends_with(ext))
    }
}

pub fn language_info() -> LanguageInfo {
    LanguageInfo {
        name: "VML",
        full_name: "Versatile Markup Language",
        extensions: &[".vml", ".vmark"],
        description: "A versatile markup language combining Markdown, AML, and custom features",
    }
}

/// Sample document touching every construct
pub const EXAMPLE_SOURCE: &str = r#"---
title: VML Example Document
author: Your Name
version: 1.0
---

# Welcome to VML

VML is a **versatile markup language** that combines the best of various formats.

## Features

@directive[type=list, style=bullet]
- Easy to read and write
- Supports ${variables} and %{templates}
- Custom markup: !!important!!, <~context~>, (*notes*)
- Advanced sections and directives

:: section[class=example, id=demo]
### Example Section

This is a [[annotated]] section with special properties.

| Feature | Support | Notes |
|---------|:-------:|-------|
| Markdown | Yes | Full support |
| Variables | Yes | ${var_name} |
| Templates | Yes | %{template} |
| Custom | Yes | Multiple types |
:: /section

@if has_feature("advanced") {
  This content only appears if advanced features are enabled.
}

/!Warning: This is experimental!/
/+Success: But it works great!+/
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Alignment, Element};
    use crate::parser::VmlParser;
    use crate::traits::{ParseConfig, Parser};
    use crate::validate::validate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_language_info() {
        let info = language_info();
        assert_eq!(info.name, "VML");
        assert!(info.matches_path("notes/Draft.VMARK"));
        assert!(!info.matches_path("readme.md"));
    }

    #[test]
    fn test_example_parses() {
        let doc = VmlParser::new()
            .parse(EXAMPLE_SOURCE, &ParseConfig::default())
            .unwrap();
        assert_eq!(doc.title(), Some("VML Example Document"));
        assert_eq!(doc.metadata.get("version").map(String::as_str), Some("1.0"));

        let section = doc
            .elements
            .iter()
            .find(|e| matches!(e, Element::Section { .. }))
            .unwrap();
        match section {
            Element::Section {
                name,
                attributes,
                children,
                line,
            } => {
                assert_eq!(name, "section");
                assert_eq!(attributes.get("id").and_then(|v| v.as_text()), Some("demo"));
                assert_eq!(*line, 19);
                assert!(matches!(
                    children.last(),
                    Some(Element::Table { alignment, rows, .. })
                        if alignment == &vec![Alignment::Left, Alignment::Center, Alignment::Left]
                            && rows.len() == 4
                ));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_example_validates() {
        let report = validate(EXAMPLE_SOURCE);
        assert!(report.is_valid, "{:?}", report.diagnostics);
    }
}
