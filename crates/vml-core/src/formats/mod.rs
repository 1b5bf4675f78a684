// SPDX-License-Identifier: AGPL-3.0-or-later
//! Renderers for each output format

pub mod html;
pub mod markdown;

pub use html::HtmlRenderer;
pub use markdown::MarkdownRenderer;
