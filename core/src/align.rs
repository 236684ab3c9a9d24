//! Reading alignment: assign a slice of a flat reading to each kanji run.
//!
//! The reading is consumed left to right by a single cursor that never moves
//! backwards. Kana and other literal runs resynchronize the cursor when they
//! match the reading verbatim. A kanji run takes everything between the
//! cursor and the next occurrence of its anchor (the literal run right after
//! it), or the whole remainder when it has no anchor.
//!
//! Alignment never fails. When the anchor is missing from the reading the
//! kanji run is left without ruby text; when a literal run does not match,
//! the cursor simply stays put.
//!
//! Two kanji runs next to each other (which `segment` never produces, but a
//! caller-built run list can contain) are not split: the first takes the
//! whole remainder and the second is left with nothing.

use crate::kana;
use crate::segment::Run;
use tracing::{debug, trace};

/// A run paired with the reading slice assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRun<'a, 'r> {
    pub run: Run<'a>,
    /// Slice of the normalized reading; `None` for literal runs and for
    /// kanji runs whose anchor could not be located
    pub ruby: Option<&'r str>,
}

impl<'a, 'r> AlignedRun<'a, 'r> {
    fn plain(run: Run<'a>) -> Self {
        Self { run, ruby: None }
    }

    /// Ruby text if present and non-empty.
    pub fn ruby_text(&self) -> Option<&'r str> {
        self.ruby.filter(|r| !r.is_empty())
    }
}

/// Align `runs` against an already normalized reading.
pub fn align<'a, 'r>(runs: &[Run<'a>], reading: &'r str) -> Vec<AlignedRun<'a, 'r>> {
    let mut cursor = 0usize;
    let mut out = Vec::with_capacity(runs.len());

    for (idx, run) in runs.iter().enumerate() {
        if run.class.is_literal() {
            let literal = kana::normalize_cow(run.text);
            if reading[cursor..].starts_with(literal.as_ref()) {
                cursor += literal.len();
            } else {
                trace!(run = run.text, cursor, "literal run diverges from reading");
            }
            out.push(AlignedRun::plain(run.clone()));
            continue;
        }

        let anchor = runs
            .get(idx + 1)
            .filter(|next| next.class.is_literal())
            .map(|next| kana::normalize_cow(next.text))
            .filter(|anchor| !anchor.is_empty());

        let ruby = match anchor {
            Some(anchor) => match reading[cursor..].find(anchor.as_ref()) {
                Some(offset) => {
                    let end = cursor + offset;
                    let slice = &reading[cursor..end];
                    cursor = end;
                    Some(slice)
                }
                None => {
                    debug!(
                        run = run.text,
                        anchor = anchor.as_ref(),
                        cursor,
                        "anchor not found in reading, leaving run unannotated"
                    );
                    None
                }
            },
            None => {
                let slice = &reading[cursor..];
                cursor = reading.len();
                Some(slice)
            }
        };

        out.push(AlignedRun {
            run: run.clone(),
            ruby,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::ScriptClass;
    use crate::segment::segment;

    fn rubies<'r>(aligned: &[AlignedRun<'_, 'r>]) -> Vec<Option<&'r str>> {
        aligned.iter().map(|a| a.ruby_text()).collect()
    }

    #[test]
    fn test_okurigana() {
        let runs = segment("食べる");
        let aligned = align(&runs, "たべる");
        assert_eq!(rubies(&aligned), vec![Some("た"), None]);
    }

    #[test]
    fn test_leading_kana_then_trailing_kanji() {
        let runs = segment("お茶");
        let aligned = align(&runs, "おちゃ");
        assert_eq!(rubies(&aligned), vec![None, Some("ちゃ")]);
    }

    #[test]
    fn test_multiple_kanji_runs() {
        let runs = segment("持ち帰り");
        let aligned = align(&runs, "もちかえり");
        assert_eq!(rubies(&aligned), vec![Some("も"), None, Some("かえ"), None]);
    }

    #[test]
    fn test_missing_anchor_leaves_run_plain() {
        // は is read わ, so the anchor never appears in the reading
        let runs = segment("今日は");
        let aligned = align(&runs, "きょうわ");
        assert_eq!(rubies(&aligned), vec![None, None]);
    }

    #[test]
    fn test_literal_mismatch_keeps_cursor() {
        // the ASCII run does not appear in the reading; the cursor stays at
        // the start, so the final kanji run receives the whole reading
        let runs = segment("A型");
        let aligned = align(&runs, "えーがた");
        assert_eq!(rubies(&aligned), vec![None, Some("えーがた")]);
    }

    #[test]
    fn test_empty_reading() {
        let runs = segment("漢字を読む");
        let aligned = align(&runs, "");
        assert!(aligned.iter().all(|a| a.ruby_text().is_none()));
        assert_eq!(aligned.len(), runs.len());
    }

    #[test]
    fn test_empty_surface() {
        assert!(align(&[], "よみ").is_empty());
    }

    #[test]
    fn test_adjacent_logographic_runs() {
        let runs = vec![
            Run::new("日", ScriptClass::Logographic, 0..3),
            Run::new("本", ScriptClass::Logographic, 3..6),
        ];
        let aligned = align(&runs, "にほん");
        assert_eq!(aligned[0].ruby, Some("にほん"));
        assert_eq!(aligned[1].ruby, Some(""));
        assert_eq!(aligned[1].ruby_text(), None);
    }

    #[test]
    fn test_reading_exhausted_keeps_literal_runs() {
        let runs = segment("本を読む");
        let aligned = align(&runs, "ほん");
        assert_eq!(aligned.len(), 4);
        assert_eq!(aligned[0].ruby_text(), None);
        assert_eq!(aligned[3].run.text, "む");
    }

    #[test]
    fn test_katakana_anchor_matches_hiragana_reading() {
        let runs = segment("手ガミ");
        let aligned = align(&runs, "てがみ");
        assert_eq!(rubies(&aligned), vec![Some("て"), None]);
    }
}
