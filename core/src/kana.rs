//! Katakana to hiragana normalization.
//!
//! Readings and surface anchors are compared in hiragana. The shift covers
//! ァ (U+30A1) through ヶ (U+30F6), which map one-to-one onto ぁ (U+3041)
//! through ゖ (U+3096). Everything outside that range, including ー and the
//! half-width forms, passes through untouched. Both ranges encode to three
//! UTF-8 bytes, so byte offsets computed on normalized text are valid on the
//! input as well.

use std::borrow::Cow;

const KATAKANA_FIRST: u32 = 0x30A1;
const KATAKANA_LAST: u32 = 0x30F6;
const HIRAGANA_OFFSET: u32 = 0x60;

/// Map a single katakana character to hiragana.
pub fn to_hiragana(ch: char) -> char {
    let code = ch as u32;
    if (KATAKANA_FIRST..=KATAKANA_LAST).contains(&code) {
        char::from_u32(code - HIRAGANA_OFFSET).unwrap_or(ch)
    } else {
        ch
    }
}

/// Map a single hiragana character back to katakana (inverse of `to_hiragana`
/// on the shifted range).
pub fn to_katakana(ch: char) -> char {
    let code = ch as u32;
    if (KATAKANA_FIRST - HIRAGANA_OFFSET..=KATAKANA_LAST - HIRAGANA_OFFSET).contains(&code) {
        char::from_u32(code + HIRAGANA_OFFSET).unwrap_or(ch)
    } else {
        ch
    }
}

/// Normalize text for reading comparison.
pub fn normalize(text: &str) -> String {
    text.chars().map(to_hiragana).collect()
}

/// Normalize without allocating when nothing needs shifting.
pub fn normalize_cow(text: &str) -> Cow<'_, str> {
    if is_normalized(text) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(normalize(text))
    }
}

/// True when `normalize` would return the text unchanged.
pub fn is_normalized(text: &str) -> bool {
    text.chars().all(|ch| to_hiragana(ch) == ch)
}

/// Render hiragana as katakana.
pub fn katakana(text: &str) -> String {
    text.chars().map(to_katakana).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_katakana() {
        assert_eq!(normalize("カタカナ"), "かたかな");
        assert_eq!(normalize("ヴァイオリン"), "ゔぁいおりん");
        assert_eq!(normalize("ヵヶ"), "ゕゖ");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(normalize("コーヒー"), "こーひー");
        assert_eq!(normalize("漢字 abc 123、"), "漢字 abc 123、");
        assert_eq!(normalize("ｶﾀｶﾅ"), "ｶﾀｶﾅ");
        assert_eq!(normalize("ヽヾ・"), "ヽヾ・");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_byte_length_preserved() {
        let s = "ハンバーガーを食べる";
        assert_eq!(normalize(s).len(), s.len());
    }

    #[test]
    fn test_is_normalized() {
        assert!(is_normalized("ひらがな"));
        assert!(!is_normalized("ひらガな"));
        assert!(matches!(normalize_cow("たべる"), Cow::Borrowed(_)));
        assert_eq!(normalize_cow("タベル"), "たべる");
    }

    #[test]
    fn test_katakana_round_trip() {
        assert_eq!(katakana("かたかな"), "カタカナ");
        assert_eq!(normalize(&katakana("ゔぁいおりん")), "ゔぁいおりん");
    }
}
