// SPDX-License-Identifier: AGPL-3.0-or-later
//! Parser and Renderer traits, configuration and errors

use crate::ast::Document;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Error type for parsing and rendering
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Section nesting exceeds {limit} levels at line {line}")]
    NestingTooDeep { line: usize, limit: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Render targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    Markdown,
}

impl OutputFormat {
    /// File extension for this format
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "md",
        }
    }

    /// Short display name
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Markdown => "MD",
        }
    }

    pub const ALL: [Self; 2] = [Self::Html, Self::Markdown];
}

/// Configuration for parsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseConfig {
    /// Keep raw source on the document
    pub preserve_raw_source: bool,
    /// Deepest section nesting accepted before parsing fails
    pub max_section_depth: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            preserve_raw_source: false,
            max_section_depth: 64,
        }
    }
}

/// Configuration for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Wrap HTML output in a full document shell
    pub standalone: bool,
    /// Emit metadata as a frontmatter block in Markdown output
    pub front_matter: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            standalone: true,
            front_matter: true,
        }
    }
}

/// Parser trait: convert VML source to a document tree
pub trait Parser: Send + Sync {
    /// Parse a string into a Document
    fn parse(&self, input: &str, config: &ParseConfig) -> Result<Document>;
}

/// Renderer trait: project a document tree into a target format
pub trait Renderer: Send + Sync {
    /// The target format this renderer produces
    fn format(&self) -> OutputFormat;

    /// Render a Document to a string
    fn render(&self, doc: &Document, config: &RenderConfig) -> Result<String>;
}

/// Extension trait for streaming operations (not dyn-compatible)
pub trait ParserExt: Parser {
    /// Parse from a reader
    fn parse_reader<R: Read>(&self, reader: R, config: &ParseConfig) -> Result<Document> {
        let mut input = String::new();
        let mut reader = reader;
        reader.read_to_string(&mut input)?;
        self.parse(&input, config)
    }
}

/// Extension trait for streaming operations (not dyn-compatible)
pub trait RendererExt: Renderer {
    /// Render to a writer
    fn render_writer<W: Write>(
        &self,
        doc: &Document,
        writer: &mut W,
        config: &RenderConfig,
    ) -> Result<()> {
        let output = self.render(doc, config)?;
        writer.write_all(output.as_bytes())?;
        Ok(())
    }
}

// Blanket implementations
impl<T: Parser> ParserExt for T {}
impl<T: Renderer> RendererExt for T {}

/// Renderer for a target format
pub fn renderer_for(format: OutputFormat) -> Box<dyn Renderer> {
    use crate::formats::{HtmlRenderer, MarkdownRenderer};

    match format {
        OutputFormat::Html => Box::new(HtmlRenderer::new()),
        OutputFormat::Markdown => Box::new(MarkdownRenderer::new()),
    }
}

/// Parse VML source and render it to `to`
pub fn convert(
    input: &str,
    to: OutputFormat,
    parse_config: &ParseConfig,
    render_config: &RenderConfig,
) -> Result<String> {
    use crate::parser::VmlParser;

    let doc = VmlParser::new().parse(input, parse_config)?;
    renderer_for(to).render(&doc, render_config)
}
