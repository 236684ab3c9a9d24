// libfurigana/src/engine.rs
//
// Cached furigana engine.
//
// Alignment is cheap but study sessions render the same handful of cards over
// and over (question, result, undo, retry), so results are kept in an LRU
// cache keyed by the raw (surface, reading) pair.

use std::cell::RefCell;
use std::num::NonZeroUsize;

use libkana_core::{annotate_with, Annotation, StudyCard};

use crate::config::FuriganaConfig;
use crate::render::{self, RenderFormat};

const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => unreachable!(),
};

/// Rendered view of one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCard {
    pub headline: String,
    pub furigana: String,
    pub reading: String,
    pub meanings: Vec<String>,
    pub notes: String,
}

/// Furigana engine with an annotation cache.
pub struct Engine {
    config: FuriganaConfig,
    cache: RefCell<lru::LruCache<(String, String), Vec<Annotation>>>,
    cache_hits: RefCell<usize>,
    cache_misses: RefCell<usize>,
}

impl Engine {
    /// Create an engine; the cache holds `max_cache_size` entries.
    pub fn new(config: FuriganaConfig) -> Self {
        let capacity =
            NonZeroUsize::new(config.base().max_cache_size).unwrap_or(DEFAULT_CACHE_CAPACITY);

        Self {
            config,
            cache: RefCell::new(lru::LruCache::new(capacity)),
            cache_hits: RefCell::new(0),
            cache_misses: RefCell::new(0),
        }
    }

    pub fn config(&self) -> &FuriganaConfig {
        &self.config
    }

    /// Annotate `surface` with `reading`. Same output as
    /// `libkana_core::annotate_with` under this engine's config.
    pub fn annotate(&self, surface: &str, reading: &str) -> Vec<Annotation> {
        let key = (surface.to_string(), reading.to_string());
        if let Some(cached) = self.cache.borrow_mut().get(&key) {
            *self.cache_hits.borrow_mut() += 1;
            return cached.clone();
        }

        *self.cache_misses.borrow_mut() += 1;
        let annotations = annotate_with(surface, reading, self.config.base());
        tracing::trace!(surface, reading, count = annotations.len(), "annotated");
        self.cache.borrow_mut().put(key, annotations.clone());
        annotations
    }

    /// Annotate and render in the configured format.
    pub fn render(&self, surface: &str, reading: &str) -> anyhow::Result<String> {
        self.render_as(surface, reading, self.config.format)
    }

    pub fn render_as(
        &self,
        surface: &str,
        reading: &str,
        format: RenderFormat,
    ) -> anyhow::Result<String> {
        let annotations = self.annotate(surface, reading);
        render::render(&annotations, format, &self.config)
    }

    /// Render every display field of a card.
    pub fn render_card(&self, card: &StudyCard, format: RenderFormat) -> anyhow::Result<RenderedCard> {
        Ok(RenderedCard {
            headline: card.front.clone(),
            furigana: self.render_as(&card.front, &card.reading, format)?,
            reading: card.reading_ui.clone(),
            meanings: card.meanings(),
            notes: render::render_notes(&card.notes, format, &self.config),
        })
    }

    /// Get cache statistics for monitoring.
    ///
    /// Returns (hits, misses) tuple.
    pub fn cache_stats(&self) -> (usize, usize) {
        (*self.cache_hits.borrow(), *self.cache_misses.borrow())
    }

    /// Get cache hit rate as a percentage (0.0 to 100.0).
    ///
    /// Returns None if no cache accesses have been made yet.
    pub fn cache_hit_rate(&self) -> Option<f32> {
        let (hits, misses) = self.cache_stats();
        let total = hits + misses;
        if total == 0 {
            None
        } else {
            Some((hits as f32 / total as f32) * 100.0)
        }
    }

    pub fn cache_size(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache.borrow().cap().get()
    }

    /// Clear the cache and reset the counters.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
        *self.cache_hits.borrow_mut() = 0;
        *self.cache_misses.borrow_mut() = 0;
        tracing::debug!("annotation cache cleared");
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(FuriganaConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_and_misses() {
        let engine = Engine::default();
        let first = engine.annotate("食べる", "たべる");
        let second = engine.annotate("食べる", "たべる");
        assert_eq!(first, second);
        assert_eq!(engine.cache_stats(), (1, 1));
        assert_eq!(engine.cache_hit_rate(), Some(50.0));
    }

    #[test]
    fn test_raw_reading_is_part_of_key() {
        let engine = Engine::default();
        engine.annotate("食べる", "たべる");
        engine.annotate("食べる", "タベル");
        assert_eq!(engine.cache_stats(), (0, 2));
        assert_eq!(engine.cache_size(), 2);
    }

    #[test]
    fn test_zero_capacity_falls_back() {
        let mut config = FuriganaConfig::default();
        config.base_mut().max_cache_size = 0;
        assert_eq!(Engine::new(config).cache_capacity(), 1000);
    }

    #[test]
    fn test_eviction() {
        let mut config = FuriganaConfig::default();
        config.base_mut().max_cache_size = 1;
        let engine = Engine::new(config);
        engine.annotate("水", "みず");
        engine.annotate("火", "ひ");
        engine.annotate("水", "みず");
        assert_eq!(engine.cache_stats(), (0, 3));
    }

    #[test]
    fn test_clear_cache() {
        let engine = Engine::default();
        engine.annotate("水", "みず");
        engine.annotate("水", "みず");
        engine.clear_cache();
        assert_eq!(engine.cache_stats(), (0, 0));
        assert_eq!(engine.cache_size(), 0);
        assert_eq!(engine.cache_hit_rate(), None);
    }

    #[test]
    fn test_merge_config_applies() {
        let mut config = FuriganaConfig::default();
        config.base_mut().merge_plain_annotations = true;
        let engine = Engine::new(config);
        // missing anchor: both runs fall back to plain and merge
        assert_eq!(
            engine.annotate("今日は雨", "きょうわあめ")[0],
            Annotation::plain("今日は")
        );
    }

    #[test]
    fn test_render_card() {
        let engine = Engine::default();
        let card = StudyCard::from_fields(7, "食べる", "食[た]べる", "to eat<br>to consume");
        let view = engine.render_card(&card, RenderFormat::Bracket).unwrap();
        assert_eq!(view.headline, "食べる");
        assert_eq!(view.furigana, "食[た]べる");
        assert_eq!(view.reading, "食べる (たべる)");
        assert_eq!(view.meanings, vec!["to eat", "to consume"]);
        assert_eq!(view.notes, "to eat\nto consume");
    }
}
