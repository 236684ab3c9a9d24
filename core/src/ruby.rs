//! Annotation output and the `annotate` entry point.
//!
//! `annotate(surface, reading)` runs the whole pipeline:
//!
//! 1. normalize the reading to hiragana
//! 2. segment the surface into script runs
//! 3. align runs against the reading
//! 4. emit one `Annotation` per run
//!
//! Annotation text is never escaped; renderers are responsible for that.

use crate::align::{align, AlignedRun};
use crate::kana;
use crate::segment::segment;
use crate::Config;
use serde::{Deserialize, Serialize};

/// One unit of renderable output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Annotation {
    /// Text shown as-is
    Plain { text: String },
    /// Base text with a reading gloss
    Ruby {
        text: String,
        #[serde(rename = "rubyText")]
        ruby_text: String,
    },
}

impl Annotation {
    pub fn plain<T: Into<String>>(text: T) -> Self {
        Annotation::Plain { text: text.into() }
    }

    pub fn ruby<T: Into<String>, R: Into<String>>(text: T, ruby_text: R) -> Self {
        Annotation::Ruby {
            text: text.into(),
            ruby_text: ruby_text.into(),
        }
    }

    /// Base text (always part of the surface string).
    pub fn text(&self) -> &str {
        match self {
            Annotation::Plain { text } | Annotation::Ruby { text, .. } => text,
        }
    }

    /// Reading gloss, if this is a ruby annotation.
    pub fn ruby_text(&self) -> Option<&str> {
        match self {
            Annotation::Plain { .. } => None,
            Annotation::Ruby { ruby_text, .. } => Some(ruby_text),
        }
    }

    pub fn is_ruby(&self) -> bool {
        matches!(self, Annotation::Ruby { .. })
    }
}

/// Turn aligned runs into annotations, one per run.
pub fn emit(aligned: &[AlignedRun<'_, '_>]) -> Vec<Annotation> {
    aligned
        .iter()
        .map(|a| match a.ruby_text() {
            Some(ruby) => Annotation::ruby(a.run.text, ruby),
            None => Annotation::plain(a.run.text),
        })
        .collect()
}

/// Merge neighbouring plain annotations. Concatenated text is unchanged.
pub fn merge_plain(annotations: Vec<Annotation>) -> Vec<Annotation> {
    let mut out: Vec<Annotation> = Vec::with_capacity(annotations.len());
    for ann in annotations {
        if let Annotation::Plain { text } = &ann {
            if let Some(Annotation::Plain { text: prev }) = out.last_mut() {
                prev.push_str(text);
                continue;
            }
        }
        out.push(ann);
    }
    out
}

/// Concatenate the base text of every annotation.
pub fn surface_text(annotations: &[Annotation]) -> String {
    annotations.iter().map(Annotation::text).collect()
}

/// Annotate `surface` with the reading slices of `reading` (either kana
/// script).
pub fn annotate(surface: &str, reading: &str) -> Vec<Annotation> {
    let reading = kana::normalize(reading);
    let runs = segment(surface);
    emit(&align(&runs, &reading))
}

/// `annotate` honouring the output options in `config`.
pub fn annotate_with(surface: &str, reading: &str, config: &Config) -> Vec<Annotation> {
    let annotations = annotate(surface, reading);
    if config.merge_plain_annotations {
        merge_plain(annotations)
    } else {
        annotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_okurigana() {
        let out = annotate("食べる", "たべる");
        assert_eq!(
            out,
            vec![Annotation::ruby("食", "た"), Annotation::plain("べる")]
        );
    }

    #[test]
    fn test_annotate_katakana_reading() {
        assert_eq!(annotate("勉強する", "ベンキョウスル"), annotate("勉強する", "べんきょうする"));
        assert_eq!(
            annotate("勉強する", "ベンキョウスル")[0],
            Annotation::ruby("勉強", "べんきょう")
        );
    }

    #[test]
    fn test_single_kanji_then_kana() {
        let out = annotate("字か", "じか");
        assert_eq!(out, vec![Annotation::ruby("字", "じ"), Annotation::plain("か")]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(annotate("", "よみ").is_empty());
        let out = annotate("漢字", "");
        assert_eq!(out, vec![Annotation::plain("漢字")]);
    }

    #[test]
    fn test_text_preserved() {
        let surface = "今日は、いい天気ですね！";
        let out = annotate(surface, "きょうは、いいてんきですね！");
        assert_eq!(surface_text(&out), surface);
    }

    #[test]
    fn test_merge_plain() {
        let merged = merge_plain(vec![
            Annotation::plain("今日"),
            Annotation::plain("は"),
            Annotation::ruby("雨", "あめ"),
            Annotation::plain("だ"),
            Annotation::plain("。"),
        ]);
        assert_eq!(
            merged,
            vec![
                Annotation::plain("今日は"),
                Annotation::ruby("雨", "あめ"),
                Annotation::plain("だ。"),
            ]
        );
    }

    #[test]
    fn test_annotate_with_merge() {
        let mut config = Config::default();
        config.merge_plain_annotations = true;
        let out = annotate_with("今日は", "きょうわ", &config);
        assert_eq!(out, vec![Annotation::plain("今日は")]);
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&Annotation::ruby("食", "た")).unwrap();
        assert_eq!(json, r#"{"kind":"ruby","text":"食","rubyText":"た"}"#);
        let json = serde_json::to_string(&Annotation::plain("べる")).unwrap();
        assert_eq!(json, r#"{"kind":"plain","text":"べる"}"#);
    }
}
