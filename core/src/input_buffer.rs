//! Answer text buffer with cursor tracking.
//!
//! Holds whatever is in the answer field and where the caret sits. The
//! cursor is a byte offset that always lies on a character boundary, which
//! matters once romaji has been replaced by three-byte kana.

/// Text buffer with a byte-offset cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position (byte offset).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Replace the whole content; the cursor moves to the end.
    pub fn set_text<T: Into<String>>(&mut self, text: T) {
        self.text = text.into();
        self.cursor = self.text.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_text_moves_cursor_to_end() {
        let mut buf = InputBuffer::new();
        buf.set_text("かな");
        assert_eq!(buf.cursor(), 6);
        assert_eq!(buf.len(), 6);
        buf.set_text("か");
        assert_eq!(buf.cursor(), 3);
    }

    #[test]
    fn test_clear() {
        let mut buf = InputBuffer::new();
        buf.set_text("abc");
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.cursor(), 0);
    }
}
