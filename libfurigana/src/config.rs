//! Furigana front-end configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All generic options from `libkana_core::Config` (flattened via serde)
//! - The default output format for rendered annotations
//! - Whether HTML ruby carries `<rp>` parenthesis fallbacks
//!
//! # Example
//!
//! ```rust
//! use libfurigana::FuriganaConfig;
//!
//! let config = FuriganaConfig::from_toml_str("format = \"bracket\"\nmax_cache_size = 64\n").unwrap();
//! assert_eq!(config.base().max_cache_size, 64);
//! ```
use serde::{Deserialize, Serialize};

use crate::render::RenderFormat;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FuriganaConfig {
    /// Base configuration fields (merging, cache size, notes, kana input)
    #[serde(flatten)]
    pub base: libkana_core::Config,

    /// Output format used when none is given explicitly
    pub format: RenderFormat,

    /// Emit `<rp>(</rp>` / `<rp>)</rp>` around ruby text in HTML
    pub ruby_parentheses: bool,
}

impl Default for FuriganaConfig {
    fn default() -> Self {
        Self {
            base: libkana_core::Config::default(),
            format: RenderFormat::Html,
            ruby_parentheses: true,
        }
    }
}

impl FuriganaConfig {
    /// Convert this config into the base config used by core functions
    pub fn into_base(self) -> libkana_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &libkana_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut libkana_core::Config {
        &mut self.base
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded furigana config");
        Ok(config)
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FuriganaConfig::default();
        assert_eq!(config.format, RenderFormat::Html);
        assert!(config.ruby_parentheses);
        assert_eq!(config.base().max_cache_size, 1000);
    }

    #[test]
    fn test_flattened_toml() {
        let config = FuriganaConfig::from_toml_str(
            "format = \"text\"\nruby_parentheses = false\nnote_placeholder = \"(none)\"\n",
        )
        .unwrap();
        assert_eq!(config.format, RenderFormat::Text);
        assert!(!config.ruby_parentheses);
        assert_eq!(config.base().note_placeholder, "(none)");
        assert!(config.base().kana_input);
    }

    #[test]
    fn test_round_trip() {
        let mut config = FuriganaConfig::default();
        config.format = RenderFormat::Json;
        config.base_mut().merge_plain_annotations = true;
        let text = config.to_toml_string().unwrap();
        assert_eq!(FuriganaConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_into_base() {
        let mut config = FuriganaConfig::default();
        config.base_mut().max_cache_size = 7;
        assert_eq!(config.into_base().max_cache_size, 7);
    }
}
