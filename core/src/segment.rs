//! Run segmentation of surface text.
//!
//! A run is a maximal stretch of characters sharing one `ScriptClass`. For
//! "食べ物" the runs are `食` (logographic), `べ` (phonetic) and `物`
//! (logographic). Runs partition the input: their ranges are contiguous,
//! start at 0, end at `text.len()`, and concatenating their text gives back
//! the input.

use crate::script::{classify, ScriptClass};
use std::ops::Range;

/// A maximal run of one script class within the surface text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<'a> {
    /// The run's text, borrowed from the surface string
    pub text: &'a str,
    /// Shared class of every character in the run
    pub class: ScriptClass,
    /// Byte range in the surface string
    pub range: Range<usize>,
}

impl<'a> Run<'a> {
    pub fn new(text: &'a str, class: ScriptClass, range: Range<usize>) -> Self {
        Self { text, class, range }
    }

    pub fn is_logographic(&self) -> bool {
        self.class == ScriptClass::Logographic
    }

    /// Start offset (bytes) in the surface string.
    pub fn start(&self) -> usize {
        self.range.start
    }

    /// End offset (bytes, exclusive) in the surface string.
    pub fn end(&self) -> usize {
        self.range.end
    }
}

/// Split `text` into maximal same-class runs, in order.
pub fn segment(text: &str) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    let mut current: Option<(ScriptClass, usize)> = None;

    for (idx, ch) in text.char_indices() {
        let class = classify(ch);
        match current {
            Some((open, _)) if open == class => {}
            Some((open, start)) => {
                runs.push(Run::new(&text[start..idx], open, start..idx));
                current = Some((class, idx));
            }
            None => current = Some((class, idx)),
        }
    }

    if let Some((open, start)) = current {
        runs.push(Run::new(&text[start..], open, start..text.len()));
    }

    runs
}
