// core/tests/alignment_properties.rs
//
// Property tests for the annotate pipeline.
//
// Tests cover:
// - Surface text is preserved exactly
// - Identical calls give identical output
// - Hiragana and katakana readings give the same annotations
// - Empty readings never produce ruby text
// - Ruby slices never overlap and come out in reading order

use libkana_core::{annotate, kana, ruby::surface_text, Annotation};
use proptest::prelude::*;

const SURFACE_CHARS: &[char] = &[
    '食', '物', '日', '本', '語', '々', 'た', 'べ', 'る', 'の', 'ン', 'カ', 'ー', '、', '。', 'a',
    '1', ' ',
];

const READING_CHARS: &[char] = &['た', 'べ', 'る', 'の', 'に', 'ほ', 'ん', 'ご', 'か', 'ー', 'ゃ'];

fn surface() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(SURFACE_CHARS), 0..12)
        .prop_map(|chars| chars.into_iter().collect())
}

fn hiragana_reading() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(READING_CHARS), 0..16)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn text_is_preserved(surface in surface(), reading in hiragana_reading()) {
        let out = annotate(&surface, &reading);
        prop_assert_eq!(surface_text(&out), surface);
    }

    #[test]
    fn arbitrary_text_is_preserved(surface in ".*", reading in ".*") {
        let out = annotate(&surface, &reading);
        prop_assert_eq!(surface_text(&out), surface);
    }

    #[test]
    fn alignment_is_deterministic(surface in surface(), reading in hiragana_reading()) {
        prop_assert_eq!(annotate(&surface, &reading), annotate(&surface, &reading));
    }

    #[test]
    fn script_insensitive(surface in surface(), reading in hiragana_reading()) {
        let katakana = kana::katakana(&reading);
        prop_assert_eq!(annotate(&surface, &reading), annotate(&surface, &katakana));
    }

    #[test]
    fn empty_reading_has_no_ruby(surface in surface()) {
        let out = annotate(&surface, "");
        prop_assert!(out.iter().all(|a| !a.is_ruby()));
        prop_assert_eq!(surface_text(&out), surface);
    }

    #[test]
    fn ruby_slices_follow_reading_order(surface in surface(), reading in hiragana_reading()) {
        let out = annotate(&surface, &reading);
        let mut from = 0usize;
        for ann in &out {
            if let Some(ruby) = ann.ruby_text() {
                prop_assert!(!ruby.is_empty());
                let found = reading[from..].find(ruby);
                prop_assert!(found.is_some(), "{:?} not found after {}", ruby, from);
                from += found.unwrap_or(0) + ruby.len();
            }
        }
    }
}

#[test]
fn simple_two_run_case() {
    let out = annotate("字か", "じか");
    assert_eq!(
        out,
        vec![Annotation::ruby("字", "じ"), Annotation::plain("か")]
    );
}

#[test]
fn missing_anchor_falls_back_to_plain() {
    // は is read わ here, so the anchor never shows up in the reading
    let out = annotate("今日は雨", "きょうわあめ");
    assert_eq!(out[0], Annotation::plain("今日"));
    assert_eq!(out[1], Annotation::plain("は"));
    assert_eq!(surface_text(&out), "今日は雨");
}

#[test]
fn katakana_surface_against_hiragana_reading() {
    let out = annotate("コーヒー牛乳", "こーひーぎゅうにゅう");
    assert_eq!(
        out,
        vec![
            Annotation::plain("コーヒー"),
            Annotation::ruby("牛乳", "ぎゅうにゅう"),
        ]
    );
}

#[test]
fn punctuation_keeps_cursor_in_sync() {
    let out = annotate("右、左", "みぎ、ひだり");
    assert_eq!(
        out,
        vec![
            Annotation::ruby("右", "みぎ"),
            Annotation::plain("、"),
            Annotation::ruby("左", "ひだり"),
        ]
    );
}
