//! Note field sanitizing.
//!
//! Flashcard note fields are edited in a rich-text editor and arrive with
//! incidental markup (`<div>`, `<b>`, `<br>`, `&nbsp;` ...). `sanitize` turns
//! them into plain text:
//!
//! 1. `<br>` in any spelling becomes a newline, CRLF/CR become LF
//! 2. remaining tags are dropped
//! 3. entities are decoded in a single pass (`&amp;lt;` yields `&lt;`)
//! 4. surrounding whitespace is trimmed
//!
//! Entity decoding follows the HTML rules for text: the full named table,
//! legacy names without `;` (`&amp`, `&eacute`), and numeric references with
//! or without `;`. Anything that does not parse as a tag or entity is kept
//! literally.

use crate::entities::{LONGEST_LEGACY_NAME, NAMED_ENTITIES};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<\s*br\s*/?\s*>").expect("valid break regex"));

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));

static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[A-Za-z][A-Za-z0-9]{0,31};?)")
        .expect("valid entity regex")
});

/// Strip markup from a note field.
pub fn sanitize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = strip_markup(raw);
    decode_entities(&text).trim().to_string()
}

/// Line breaks to `\n`, every other tag removed. Entities are left alone.
pub fn strip_markup(text: &str) -> String {
    let text = BREAK_RE.replace_all(text, "\n");
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    TAG_RE.replace_all(&text, "").into_owned()
}

/// Decode character references in one pass. Unknown names and invalid code
/// points are left as written.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITY_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let whole = &caps[0];
            let body = &caps[1];
            decode_reference(body).unwrap_or_else(|| whole.to_string())
        })
        .into_owned()
}

fn decode_reference(body: &str) -> Option<String> {
    if let Some(num) = body.strip_prefix('#') {
        let num = num.strip_suffix(';').unwrap_or(num);
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code)
            .filter(|ch| *ch != '\0')
            .map(String::from);
    }

    if let Some(value) = NAMED_ENTITIES.get(body) {
        return Some(value.to_string());
    }

    // `&notit;` is not a name, but its legacy prefix `&not` is
    let longest = LONGEST_LEGACY_NAME.min(body.len().saturating_sub(1));
    (1..=longest).rev().find_map(|len| {
        NAMED_ENTITIES
            .get(&body[..len])
            .map(|value| format!("{}{}", value, &body[len..]))
    })
}
