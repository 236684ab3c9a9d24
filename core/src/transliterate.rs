//! Kana-as-you-type for the answer field.
//!
//! Transliteration itself is a capability the UI layer plugs in through the
//! `Transliterator` trait. `AnswerField` is the edge-triggered adapter: every
//! input event hands it the field's new value, and on reading prompts it
//! swaps the value for its kana form and parks the cursor at the end.

use crate::input_buffer::InputBuffer;
use crate::records::Prompt;

/// Converts typed romaji into kana.
///
/// Implementations work in IME mode: a trailing fragment that cannot be
/// converted yet (such as a lone "n" or "ky") stays as typed so the next
/// keystroke can complete it.
pub trait Transliterator {
    fn to_kana(&self, input: &str) -> String;
}

impl<F> Transliterator for F
where
    F: Fn(&str) -> String,
{
    fn to_kana(&self, input: &str) -> String {
        self(input)
    }
}

/// Answer field state plus the kana conversion hook.
#[derive(Debug, Clone)]
pub struct AnswerField {
    buffer: InputBuffer,
    prompt: Option<Prompt>,
    kana_input: bool,
}

impl AnswerField {
    pub fn new(kana_input: bool) -> Self {
        Self {
            buffer: InputBuffer::new(),
            prompt: None,
            kana_input,
        }
    }

    pub fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    /// Set which prompt the field answers; `None` disables the field.
    /// The buffer is cleared on every change.
    pub fn set_prompt(&mut self, prompt: Option<Prompt>) {
        self.prompt = prompt;
        self.buffer.clear();
    }

    pub fn is_enabled(&self) -> bool {
        self.prompt.is_some()
    }

    /// Accept the field's new content. Returns true when the content was
    /// rewritten by the transliterator.
    pub fn on_input(&mut self, value: &str, transliterator: &dyn Transliterator) -> bool {
        if self.prompt.is_none() {
            return false;
        }
        if !self.kana_input || self.prompt != Some(Prompt::Reading) {
            self.buffer.set_text(value);
            return false;
        }

        let kana = transliterator.to_kana(value);
        let rewritten = kana != value;
        self.buffer.set_text(kana);
        rewritten
    }

    /// Take the answer for submission, leaving the field empty.
    pub fn take(&mut self) -> String {
        let text = self.buffer.text().to_string();
        self.buffer.clear();
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper(input: &str) -> String {
        input.to_uppercase()
    }

    #[test]
    fn test_reading_prompt_rewrites() {
        let mut field = AnswerField::new(true);
        field.set_prompt(Some(Prompt::Reading));
        assert!(field.on_input("abc", &upper));
        assert_eq!(field.text(), "ABC");
        assert_eq!(field.buffer().cursor(), 3);
        assert!(!field.on_input("ABC", &upper));
    }

    #[test]
    fn test_meaning_prompt_untouched() {
        let mut field = AnswerField::new(true);
        field.set_prompt(Some(Prompt::Meaning));
        assert!(!field.on_input("to eat", &upper));
        assert_eq!(field.text(), "to eat");
    }

    #[test]
    fn test_kana_input_disabled() {
        let mut field = AnswerField::new(false);
        field.set_prompt(Some(Prompt::Reading));
        assert!(!field.on_input("taberu", &upper));
        assert_eq!(field.text(), "taberu");
    }

    #[test]
    fn test_disabled_field_ignores_input() {
        let mut field = AnswerField::new(true);
        assert!(!field.is_enabled());
        assert!(!field.on_input("x", &upper));
        assert_eq!(field.text(), "");
    }

    #[test]
    fn test_take_clears() {
        let mut field = AnswerField::new(true);
        field.set_prompt(Some(Prompt::Meaning));
        field.on_input("water", &upper);
        assert_eq!(field.take(), "water");
        assert_eq!(field.text(), "");
    }
}
