// libfurigana/src/romaji.rs
//
// Romaji to hiragana conversion for the answer field.
//
// Covers Hepburn and Kunrei spellings plus the usual IME conventions:
// - doubled consonants produce a small っ (kka -> っか, matcha -> まっちゃ)
// - "nn", "n'" and "n" before a consonant produce ん
// - x/l prefixes give small kana (xa -> ぁ, ltsu -> っ)
// - "-" is the long vowel mark ー
//
// Conversion runs in IME mode: a trailing fragment that is not a complete
// syllable yet ("k", "ky", a final "n") is left as typed.

use libkana_core::Transliterator;
use phf::phf_map;

const MAX_KEY_LEN: usize = 4;

static ROMAJI: phf::Map<&'static str, &'static str> = phf_map! {
    "a" => "あ", "i" => "い", "u" => "う", "e" => "え", "o" => "お",
    "ka" => "か", "ki" => "き", "ku" => "く", "ke" => "け", "ko" => "こ",
    "kya" => "きゃ", "kyu" => "きゅ", "kyo" => "きょ",
    "ga" => "が", "gi" => "ぎ", "gu" => "ぐ", "ge" => "げ", "go" => "ご",
    "gya" => "ぎゃ", "gyu" => "ぎゅ", "gyo" => "ぎょ",
    "sa" => "さ", "shi" => "し", "si" => "し", "su" => "す", "se" => "せ", "so" => "そ",
    "sha" => "しゃ", "shu" => "しゅ", "she" => "しぇ", "sho" => "しょ",
    "sya" => "しゃ", "syu" => "しゅ", "syo" => "しょ",
    "za" => "ざ", "ji" => "じ", "zi" => "じ", "zu" => "ず", "ze" => "ぜ", "zo" => "ぞ",
    "ja" => "じゃ", "ju" => "じゅ", "je" => "じぇ", "jo" => "じょ",
    "jya" => "じゃ", "jyu" => "じゅ", "jyo" => "じょ",
    "zya" => "じゃ", "zyu" => "じゅ", "zyo" => "じょ",
    "ta" => "た", "chi" => "ち", "ti" => "ち", "tsu" => "つ", "tu" => "つ", "te" => "て", "to" => "と",
    "cha" => "ちゃ", "chu" => "ちゅ", "che" => "ちぇ", "cho" => "ちょ",
    "tya" => "ちゃ", "tyu" => "ちゅ", "tyo" => "ちょ",
    "cya" => "ちゃ", "cyu" => "ちゅ", "cyo" => "ちょ",
    "da" => "だ", "di" => "ぢ", "du" => "づ", "dzu" => "づ", "de" => "で", "do" => "ど",
    "dya" => "ぢゃ", "dyu" => "ぢゅ", "dyo" => "ぢょ",
    "na" => "な", "ni" => "に", "nu" => "ぬ", "ne" => "ね", "no" => "の",
    "nya" => "にゃ", "nyu" => "にゅ", "nyo" => "にょ",
    "ha" => "は", "hi" => "ひ", "fu" => "ふ", "hu" => "ふ", "he" => "へ", "ho" => "ほ",
    "hya" => "ひゃ", "hyu" => "ひゅ", "hyo" => "ひょ",
    "fa" => "ふぁ", "fi" => "ふぃ", "fe" => "ふぇ", "fo" => "ふぉ",
    "ba" => "ば", "bi" => "び", "bu" => "ぶ", "be" => "べ", "bo" => "ぼ",
    "bya" => "びゃ", "byu" => "びゅ", "byo" => "びょ",
    "pa" => "ぱ", "pi" => "ぴ", "pu" => "ぷ", "pe" => "ぺ", "po" => "ぽ",
    "pya" => "ぴゃ", "pyu" => "ぴゅ", "pyo" => "ぴょ",
    "ma" => "ま", "mi" => "み", "mu" => "む", "me" => "め", "mo" => "も",
    "mya" => "みゃ", "myu" => "みゅ", "myo" => "みょ",
    "ya" => "や", "yu" => "ゆ", "yo" => "よ",
    "ra" => "ら", "ri" => "り", "ru" => "る", "re" => "れ", "ro" => "ろ",
    "rya" => "りゃ", "ryu" => "りゅ", "ryo" => "りょ",
    "wa" => "わ", "wi" => "うぃ", "we" => "うぇ", "wo" => "を",
    "va" => "ゔぁ", "vi" => "ゔぃ", "vu" => "ゔ", "ve" => "ゔぇ", "vo" => "ゔぉ",
    "xa" => "ぁ", "xi" => "ぃ", "xu" => "ぅ", "xe" => "ぇ", "xo" => "ぉ",
    "la" => "ぁ", "li" => "ぃ", "lu" => "ぅ", "le" => "ぇ", "lo" => "ぉ",
    "xya" => "ゃ", "xyu" => "ゅ", "xyo" => "ょ",
    "lya" => "ゃ", "lyu" => "ゅ", "lyo" => "ょ",
    "xtu" => "っ", "ltu" => "っ", "xtsu" => "っ", "ltsu" => "っ",
    "xwa" => "ゎ", "lwa" => "ゎ",
    "-" => "ー", "." => "。", "," => "、", "?" => "？", "!" => "！",
    "~" => "〜", "[" => "「", "]" => "」",
};

fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'i' | 'u' | 'e' | 'o')
}

fn is_consonant(ch: char) -> bool {
    ch.is_ascii_lowercase() && !is_vowel(ch)
}

/// Hepburn/Kunrei romaji to hiragana converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct RomajiTransliterator;

impl RomajiTransliterator {
    pub fn new() -> Self {
        Self
    }

    /// Convert `input`, leaving unfinished trailing romaji untouched.
    pub fn convert(&self, input: &str) -> String {
        let original: Vec<char> = input.chars().collect();
        let lower: Vec<char> = original.iter().map(|c| c.to_ascii_lowercase()).collect();
        let mut out = String::with_capacity(input.len() * 3);
        let mut i = 0;

        while i < lower.len() {
            let c = lower[i];
            let next = lower.get(i + 1).copied();

            if c == 'n' {
                match next {
                    None => {
                        out.push(original[i]);
                        i += 1;
                        continue;
                    }
                    Some('\'') => {
                        out.push('ん');
                        i += 2;
                        continue;
                    }
                    Some('n') => {
                        out.push('ん');
                        // "nna" is ん + な, "nn" alone is ん
                        let after = lower.get(i + 2).copied();
                        i += if after.is_some_and(|a| is_vowel(a) || a == 'y') {
                            1
                        } else {
                            2
                        };
                        continue;
                    }
                    Some(n) if is_consonant(n) && n != 'y' => {
                        out.push('ん');
                        i += 1;
                        continue;
                    }
                    _ => {}
                }
            }

            if is_consonant(c) && c != 'n' {
                let doubled = next == Some(c);
                let tch = c == 't' && next == Some('c') && lower.get(i + 2) == Some(&'h');
                if doubled || tch {
                    out.push('っ');
                    i += 1;
                    continue;
                }
            }

            match lookup(&lower, i) {
                Some((kana, len)) => {
                    out.push_str(kana);
                    i += len;
                }
                None => {
                    out.push(original[i]);
                    i += 1;
                }
            }
        }

        out
    }
}

/// Longest table match starting at `start`.
fn lookup(chars: &[char], start: usize) -> Option<(&'static str, usize)> {
    let longest = MAX_KEY_LEN.min(chars.len() - start);
    (1..=longest).rev().find_map(|len| {
        let key: String = chars[start..start + len].iter().collect();
        ROMAJI.get(key.as_str()).map(|kana| (*kana, len))
    })
}

impl Transliterator for RomajiTransliterator {
    fn to_kana(&self, input: &str) -> String {
        self.convert(input)
    }
}
