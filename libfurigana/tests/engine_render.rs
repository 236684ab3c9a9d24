// libfurigana/tests/engine_render.rs
//
// Cached engine against the uncached pipeline, and rendering of whole cards.
//
// Tests cover:
// - Cache transparency (cached output equals `annotate_with`)
// - Card records rendered in each format
// - Romaji input wired into the answer field

use libfurigana::{
    annotate_with, AnswerField, Engine, FuriganaConfig, NextCardRecord, Prompt, RenderFormat,
    RomajiTransliterator,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn cached_output_matches_pipeline(
        pairs in prop::collection::vec(("[食物水火のたべるみずひ]{0,6}", "[たべるのみずひもの]{0,8}"), 1..20)
    ) {
        let config = FuriganaConfig::default();
        let engine = Engine::new(config.clone());
        for (surface, reading) in pairs.iter().chain(pairs.iter()) {
            prop_assert_eq!(
                engine.annotate(surface, reading),
                annotate_with(surface, reading, config.base())
            );
        }
        let (hits, misses) = engine.cache_stats();
        prop_assert_eq!(hits + misses, pairs.len() * 2);
        prop_assert!(hits >= pairs.len());
    }
}

const RECORD: &str = r#"{
    "card": {"cardId": 3, "front": "お茶", "reading": "おちゃ",
             "readingUI": "お茶 (おちゃ)", "notes": "green tea; tea"},
    "prompt": "meaning", "remaining": 1, "total": 1, "completed": 0
}"#;

#[test]
fn card_record_in_every_format() {
    let engine = Engine::default();
    let record = NextCardRecord::from_json(RECORD).unwrap();
    let card = record.card.as_ref().unwrap();

    let html = engine.render_card(card, RenderFormat::Html).unwrap();
    assert_eq!(html.furigana, "お<ruby>茶<rp>(</rp><rt>ちゃ</rt><rp>)</rp></ruby>");
    assert_eq!(html.meanings, vec!["green tea", "tea"]);

    let bracket = engine.render_card(card, RenderFormat::Bracket).unwrap();
    assert_eq!(bracket.furigana, "お 茶[ちゃ]");

    let text = engine.render_card(card, RenderFormat::Text).unwrap();
    assert_eq!(text.furigana, "お茶(ちゃ)");

    let json = engine.render_card(card, RenderFormat::Json).unwrap();
    assert!(json.furigana.starts_with(r#"[{"kind":"plain","text":"お"}"#));

    // four renders of one card, one alignment
    assert_eq!(engine.cache_stats(), (3, 1));
}

#[test]
fn configured_format_without_parentheses() {
    let config = FuriganaConfig::from_toml_str("ruby_parentheses = false\n").unwrap();
    let engine = Engine::new(config);
    assert_eq!(
        engine.render("水", "みず").unwrap(),
        "<ruby>水<rt>みず</rt></ruby>"
    );
}

#[test]
fn romaji_answer_field() {
    let romaji = RomajiTransliterator::new();
    let mut field = AnswerField::new(FuriganaConfig::default().base().kana_input);
    field.set_prompt(Some(Prompt::Reading));

    assert!(field.on_input("oc", &romaji));
    assert_eq!(field.text(), "おc");
    assert!(field.on_input("おcha", &romaji));
    assert_eq!(field.text(), "おちゃ");
    assert_eq!(field.take(), "おちゃ");
}
