//! libkana-core
//!
//! Furigana alignment, kana normalization, note sanitizing and the study
//! screen state machine shared by the front-end crate (libfurigana).
//!
//! Everything in the text pipeline is a pure function: no I/O, no global
//! state, safe to call from any thread.
//!
//! Public API:
//! - `annotate` - Align a reading against surface text, producing `Annotation`s
//! - `sanitize` - Strip markup from a note field
//! - `classify` / `segment` / `align` / `emit` - The individual pipeline stages
//! - `StudyCard` - Card fields with reading and meaning extraction
//! - `StudySession` / `transition` - Study screen state machine
//! - `AnswerField` / `Transliterator` - Kana-as-you-type adapter
//! - `Config` - Configuration and feature flags
use serde::{Deserialize, Serialize};

pub mod script;
pub use script::{classify, ScriptClass};

pub mod kana;

pub mod segment;
pub use segment::{segment, Run};

pub mod align;
pub use align::{align, AlignedRun};

pub mod ruby;
pub use ruby::{annotate, annotate_with, emit, merge_plain, Annotation};

mod entities;
pub mod note;
pub use note::sanitize;

pub mod card;
pub use card::{extract_meanings, extract_reading_kana, reading_display, StudyCard};

pub mod records;
pub use records::{AckRecord, GradeRecord, LessonCard, NextCardRecord, Prompt};

pub mod session;
pub use session::{transition, Command, Progress, Request, StudyEvent, StudySession, StudyState};

pub mod input_buffer;
pub use input_buffer::InputBuffer;

pub mod transliterate;
pub use transliterate::{AnswerField, Transliterator};

/// Generic configuration shared by every front end.
///
/// Front-end specific options (output format, markup details) belong in the
/// front-end crate's own config, which flattens this one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Merge neighbouring plain annotations into one
    pub merge_plain_annotations: bool,

    // Cache Management
    /// Maximum number of entries in the (surface, reading) -> annotations cache
    pub max_cache_size: usize,

    /// Text shown in place of an empty notes field
    pub note_placeholder: String,

    /// Convert romaji to kana while typing answers to reading prompts
    pub kana_input: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            merge_plain_annotations: false,
            max_cache_size: 1000,
            note_placeholder: "-".to_string(),
            kana_input: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Display text for a notes field: sanitized, or the placeholder when
    /// nothing is left.
    pub fn note_display(&self, raw: &str) -> String {
        let text = sanitize(raw);
        if text.is_empty() {
            self.note_placeholder.clone()
        } else {
            text
        }
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(!config.merge_plain_annotations);
        assert_eq!(config.max_cache_size, 1000);
        assert!(config.kana_input);
    }

    #[test]
    fn test_config_partial_toml() {
        let config = Config::from_toml_str("merge_plain_annotations = true\n").unwrap();
        assert!(config.merge_plain_annotations);
        assert_eq!(config.note_placeholder, "-");
    }

    #[test]
    fn test_config_toml_round_trip() {
        let mut config = Config::default();
        config.note_placeholder = "(no notes)".into();
        let text = config.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_config_file_round_trip() {
        let stamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("libkana_config_{}.toml", stamp));
        let mut config = Config::default();
        config.kana_input = false;
        config.save_toml(&path).unwrap();
        let loaded = Config::load_toml(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_note_display() {
        let config = Config::default();
        assert_eq!(config.note_display("<br>"), "-");
        assert_eq!(config.note_display("<i>water</i>"), "water");
    }

    #[test]
    fn test_utils_normalize() {
        // が as か + combining dakuten composes under NFC
        assert_eq!(utils::normalize(" \u{304B}\u{3099} "), "\u{304C}");
    }
}
