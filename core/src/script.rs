//! Character classification for Japanese surface text.
//!
//! Every character falls into exactly one `ScriptClass`:
//! - `Logographic`: kanji plus the iteration/variant marks 々 〆 〤
//! - `Phonetic`: hiragana, katakana (with the elongation mark ー) and
//!   half-width katakana
//! - `Other`: punctuation, digits, Latin, whitespace and everything else

use serde::{Deserialize, Serialize};

/// Script class of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptClass {
    /// Kanji and kanji-like marks whose pronunciation needs a gloss
    Logographic,
    /// Kana: pronunciation fixed by the character itself
    Phonetic,
    /// Anything else
    Other,
}

impl ScriptClass {
    /// Phonetic and Other runs are both matched literally against a reading.
    pub fn is_literal(self) -> bool {
        !matches!(self, ScriptClass::Logographic)
    }
}

/// Classify one character.
pub fn classify(ch: char) -> ScriptClass {
    if is_logographic(ch) {
        ScriptClass::Logographic
    } else if is_phonetic(ch) {
        ScriptClass::Phonetic
    } else {
        ScriptClass::Other
    }
}

/// Kanji blocks and the iteration/variant marks used alongside them.
pub fn is_logographic(ch: char) -> bool {
    matches!(ch,
        // 々 〆 〤
        '\u{3005}' | '\u{3006}' | '\u{3024}'
        // CJK Unified Ideographs Extension A
        | '\u{3400}'..='\u{4DBF}'
        // CJK Unified Ideographs
        | '\u{4E00}'..='\u{9FFF}'
        // CJK Compatibility Ideographs
        | '\u{F900}'..='\u{FAFF}'
        // Extension B onwards, plus the compatibility supplement
        | '\u{20000}'..='\u{2FA1F}'
    )
}

/// Hiragana, katakana (without the middle dot ・) and half-width katakana.
pub fn is_phonetic(ch: char) -> bool {
    matches!(ch,
        '\u{3041}'..='\u{309F}'
        | '\u{30A1}'..='\u{30FA}'
        // ー ヽ ヾ ヿ
        | '\u{30FC}'..='\u{30FF}'
        | '\u{31F0}'..='\u{31FF}'
        | '\u{FF66}'..='\u{FF9F}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kanji_and_marks_are_logographic() {
        for ch in ['漢', '字', '食', '々', '〆', '〤', '㐀', '𠀋'] {
            assert_eq!(classify(ch), ScriptClass::Logographic, "{}", ch);
        }
    }

    #[test]
    fn test_kana_is_phonetic() {
        for ch in ['あ', 'ん', 'ゝ', 'ア', 'ン', 'ー', 'ヶ', 'ㇰ', 'ｱ', 'ﾟ'] {
            assert_eq!(classify(ch), ScriptClass::Phonetic, "{}", ch);
        }
    }

    #[test]
    fn test_everything_else_is_other() {
        for ch in ['a', 'Z', '1', ' ', '、', '。', '・', '！', '\u{3000}', '゠'] {
            assert_eq!(classify(ch), ScriptClass::Other, "{:?}", ch);
        }
    }

    #[test]
    fn test_is_literal() {
        assert!(ScriptClass::Phonetic.is_literal());
        assert!(ScriptClass::Other.is_literal());
        assert!(!ScriptClass::Logographic.is_literal());
    }
}
