// SPDX-License-Identifier: AGPL-3.0-or-later
//! Engine configuration file
//!
//! ```toml
//! [parse]
//! preserve_raw_source = false
//! max_section_depth = 64
//!
//! [render]
//! standalone = true
//! front_matter = true
//! ```

use crate::traits::{ParseConfig, RenderConfig, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parse and render settings, as loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VmlConfig {
    pub parse: ParseConfig,
    pub render: RenderConfig,
}

impl VmlConfig {
    /// Parse a TOML document; missing tables and keys take their defaults
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input)?;
        tracing::debug!(?config, "Loaded VML configuration");
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }
}
