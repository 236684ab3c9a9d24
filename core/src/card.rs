//! Flashcard field extraction.
//!
//! Cards carry three free-text fields:
//! - `Front`: the surface word (e.g. "食べる")
//! - `Back`: the reading, either plain kana or bracket furigana
//!   (`食[た]べる`, `構成[こうせい]`)
//! - `Notes`: meanings, separated by newlines, commas, semicolons, slashes or
//!   bullets, usually wrapped in editor markup
//!
//! Extraction is lenient: malformed fields produce whatever text survives,
//! never an error.

use crate::note::{decode_entities, strip_markup};
use crate::ruby::{annotate, Annotation};
use crate::utils;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const KANJI_CLASS: &str = r"\x{3005}\x{3006}\x{3024}\x{3400}-\x{4DBF}\x{4E00}-\x{9FFF}\x{F900}-\x{FAFF}\x{20000}-\x{2FA1F}";

static BRACKET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]").expect("valid bracket regex"));

static KANJI_FURIGANA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"([{KANJI_CLASS}]+)\[([^\]]+)\]")).expect("valid furigana regex")
});

static KANJI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("[{KANJI_CLASS}]")).expect("valid kanji regex"));

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

static MEANING_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\n;,/•]\s*").expect("valid meaning split regex"));

/// Flat kana reading of a back field.
///
/// `漢字[かな]` pairs collapse to their kana (keeping okurigana); a lone
/// bracket group wins outright; otherwise kanji, brackets and whitespace are
/// stripped from whatever is left.
pub fn extract_reading_kana(back: &str) -> String {
    let mut s = back.trim().to_string();
    if s.is_empty() {
        return s;
    }

    loop {
        let replaced = KANJI_FURIGANA_RE.replace_all(&s, "$2").into_owned();
        if replaced == s {
            break;
        }
        s = replaced;
    }

    if let Some(caps) = BRACKET_RE.captures(&s) {
        return caps[1].trim().to_string();
    }

    let s = KANJI_RE.replace_all(&s, "");
    WHITESPACE_RE.replace_all(&s, "").trim().to_string()
}

/// Reading as shown to the learner: `"食べる (たべる)"` when the back field
/// carries kanji, otherwise just the kana.
pub fn reading_display(back: &str) -> String {
    let raw = back.trim();
    if raw.is_empty() {
        return String::new();
    }
    let kana = extract_reading_kana(raw);
    let no_brackets = BRACKET_RE.replace_all(raw, "");
    let no_brackets = no_brackets.trim();

    if !kana.is_empty() && !no_brackets.is_empty() && no_brackets != kana {
        format!("{} ({})", no_brackets, kana)
    } else if !kana.is_empty() {
        kana
    } else {
        no_brackets.to_string()
    }
}

/// Split a notes field into individual meanings.
///
/// Entities are decoded before markup is stripped, so an escaped `&lt;br&gt;`
/// still separates two meanings.
pub fn extract_meanings(notes: &str) -> Vec<String> {
    let notes = notes.trim();
    if notes.is_empty() {
        return Vec::new();
    }
    let text = strip_markup(&decode_entities(notes));
    MEANING_SPLIT_RE
        .split(&text)
        .map(|part| WHITESPACE_RE.replace_all(part.trim(), " ").into_owned())
        .filter(|part| !part.is_empty())
        .collect()
}

/// A card as served to the study screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyCard {
    pub card_id: i64,
    /// Surface word
    pub front: String,
    /// Flat kana reading
    pub reading: String,
    /// Reading for display, see `reading_display`
    #[serde(rename = "readingUI")]
    pub reading_ui: String,
    /// Raw notes field (markup included)
    pub notes: String,
}

impl StudyCard {
    /// Build a card from raw note fields.
    pub fn from_fields(card_id: i64, front: &str, back: &str, notes: &str) -> Self {
        let back = utils::normalize(back);
        Self {
            card_id,
            front: utils::normalize(front),
            reading: extract_reading_kana(&back),
            reading_ui: reading_display(&back),
            notes: notes.to_string(),
        }
    }

    /// Furigana annotations for the front.
    pub fn furigana(&self) -> Vec<Annotation> {
        annotate(&self.front, &self.reading)
    }

    /// Meanings from the notes field.
    pub fn meanings(&self) -> Vec<String> {
        extract_meanings(&self.notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_from_bracket_furigana() {
        assert_eq!(extract_reading_kana("食[た]べる"), "たべる");
        assert_eq!(extract_reading_kana("食[た]べ 物[もの]"), "たべもの");
        assert_eq!(extract_reading_kana("構成[こうせい]"), "こうせい");
        assert_eq!(extract_reading_kana("漢字 [かんじ]"), "かんじ");
    }

    #[test]
    fn test_reading_plain_kana() {
        assert_eq!(extract_reading_kana("  たべる "), "たべる");
        assert_eq!(extract_reading_kana("食べる"), "べる");
        assert_eq!(extract_reading_kana(""), "");
    }

    #[test]
    fn test_reading_display() {
        assert_eq!(reading_display("食[た]べる"), "食べる (たべる)");
        assert_eq!(reading_display("たべる"), "たべる");
        assert_eq!(reading_display(""), "");
    }

    #[test]
    fn test_extract_meanings() {
        assert_eq!(
            extract_meanings("<div>to eat;&nbsp;to  consume</div><br>food / meal"),
            vec!["to eat", "to consume", "food", "meal"]
        );
        assert_eq!(extract_meanings("dog • hound, cur"), vec!["dog", "hound", "cur"]);
        assert!(extract_meanings("").is_empty());
        assert!(extract_meanings("<br>").is_empty());
    }

    #[test]
    fn test_meanings_split_on_escaped_break() {
        assert_eq!(
            extract_meanings("to eat&lt;br&gt;to consume"),
            vec!["to eat", "to consume"]
        );
        assert_eq!(extract_meanings("caf&eacute; &amp tea"), vec!["café & tea"]);
    }

    #[test]
    fn test_study_card_from_fields() {
        let card = StudyCard::from_fields(7, " 食べる ", "食[た]べる", "to eat");
        assert_eq!(card.card_id, 7);
        assert_eq!(card.front, "食べる");
        assert_eq!(card.reading, "たべる");
        assert_eq!(card.reading_ui, "食べる (たべる)");
        assert_eq!(card.meanings(), vec!["to eat"]);
        assert_eq!(
            card.furigana(),
            vec![Annotation::ruby("食", "た"), Annotation::plain("べる")]
        );
    }

    #[test]
    fn test_study_card_json() {
        let card: StudyCard = serde_json::from_str(
            r#"{"cardId": 3, "front": "水", "reading": "みず", "readingUI": "みず"}"#,
        )
        .unwrap();
        assert_eq!(card.card_id, 3);
        assert_eq!(card.reading_ui, "みず");
        assert_eq!(card.notes, "");
    }
}
