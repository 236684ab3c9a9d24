//! # libfurigana
//!
//! Furigana rendering, romaji answer input and a cached annotation engine
//! built on libkana-core.

pub mod config;
pub mod engine;
pub mod render;
pub mod romaji;

// Re-export the text pipeline and study components from core
pub use libkana_core::{
    annotate, annotate_with, extract_meanings, extract_reading_kana, kana, reading_display,
    sanitize, AnswerField, Annotation, Config, NextCardRecord, Prompt, StudyCard, StudySession,
    Transliterator,
};

pub use config::FuriganaConfig;
pub use engine::{Engine, RenderedCard};
pub use render::{escape_html, render, render_notes, to_bracket, to_html, to_json, to_text, RenderFormat};
pub use romaji::RomajiTransliterator;
