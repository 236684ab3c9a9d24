//! Output renderers for annotation sequences.
//!
//! Annotations carry unescaped text; escaping happens here, per format.

use std::borrow::Cow;

use libkana_core::Annotation;
use serde::{Deserialize, Serialize};

use crate::config::FuriganaConfig;

/// Output format for rendered furigana.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// `<ruby>` markup
    #[default]
    Html,
    /// Anki style `base[reading]`
    Bracket,
    /// `base(reading)`
    Text,
    /// Serialized annotation list
    Json,
}

/// Escape `& < > " '` for HTML text and attribute content.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Render as HTML `<ruby>` markup. With `parentheses`, browsers without ruby
/// support show the reading in brackets after the base.
pub fn to_html(annotations: &[Annotation], parentheses: bool) -> String {
    let mut out = String::new();
    for ann in annotations {
        match ann {
            Annotation::Plain { text } => out.push_str(&escape_html(text)),
            Annotation::Ruby { text, ruby_text } => {
                out.push_str("<ruby>");
                out.push_str(&escape_html(text));
                if parentheses {
                    out.push_str("<rp>(</rp>");
                }
                out.push_str("<rt>");
                out.push_str(&escape_html(ruby_text));
                out.push_str("</rt>");
                if parentheses {
                    out.push_str("<rp>)</rp>");
                }
                out.push_str("</ruby>");
            }
        }
    }
    out
}

/// Render in Anki furigana syntax. A bracketed run that follows other text is
/// preceded by a space, which Anki uses as the start of the base text.
pub fn to_bracket(annotations: &[Annotation]) -> String {
    let mut out = String::new();
    for ann in annotations {
        match ann {
            Annotation::Plain { text } => out.push_str(text),
            Annotation::Ruby { text, ruby_text } => {
                if out.chars().last().is_some_and(|c| !c.is_whitespace()) {
                    out.push(' ');
                }
                out.push_str(text);
                out.push('[');
                out.push_str(ruby_text);
                out.push(']');
            }
        }
    }
    out
}

/// Render as `base(reading)`.
pub fn to_text(annotations: &[Annotation]) -> String {
    annotations
        .iter()
        .map(|ann| match ann {
            Annotation::Plain { text } => text.clone(),
            Annotation::Ruby { text, ruby_text } => format!("{}({})", text, ruby_text),
        })
        .collect()
}

pub fn to_json(annotations: &[Annotation]) -> anyhow::Result<String> {
    Ok(serde_json::to_string(annotations)?)
}

/// Render with an explicit format, taking markup options from `config`.
pub fn render(
    annotations: &[Annotation],
    format: RenderFormat,
    config: &FuriganaConfig,
) -> anyhow::Result<String> {
    Ok(match format {
        RenderFormat::Html => to_html(annotations, config.ruby_parentheses),
        RenderFormat::Bracket => to_bracket(annotations),
        RenderFormat::Text => to_text(annotations),
        RenderFormat::Json => to_json(annotations)?,
    })
}

/// Notes field for display in `format`: sanitized, placeholder when empty,
/// escaped for HTML.
pub fn render_notes(raw: &str, format: RenderFormat, config: &FuriganaConfig) -> String {
    let text = config.base().note_display(raw);
    match format {
        RenderFormat::Html => escape_html(&text).replace('\n', "<br>"),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taberu() -> Vec<Annotation> {
        vec![Annotation::ruby("食", "た"), Annotation::plain("べる")]
    }

    #[test]
    fn test_escape_html() {
        assert!(matches!(escape_html("食べる"), Cow::Borrowed(_)));
        assert_eq!(escape_html("a<b & \"c\" 'd'>"), "a&lt;b &amp; &quot;c&quot; &#39;d&#39;&gt;");
    }

    #[test]
    fn test_html_with_parentheses() {
        assert_eq!(
            to_html(&taberu(), true),
            "<ruby>食<rp>(</rp><rt>た</rt><rp>)</rp></ruby>べる"
        );
    }

    #[test]
    fn test_html_without_parentheses() {
        assert_eq!(to_html(&taberu(), false), "<ruby>食<rt>た</rt></ruby>べる");
    }

    #[test]
    fn test_html_escapes_plain_text() {
        let anns = vec![Annotation::plain("<b>"), Annotation::ruby("字", "じ")];
        assert_eq!(to_html(&anns, false), "&lt;b&gt;<ruby>字<rt>じ</rt></ruby>");
    }

    #[test]
    fn test_bracket() {
        assert_eq!(to_bracket(&taberu()), "食[た]べる");
        let ocha = vec![Annotation::plain("お"), Annotation::ruby("茶", "ちゃ")];
        assert_eq!(to_bracket(&ocha), "お 茶[ちゃ]");
        let mochi = vec![
            Annotation::ruby("持", "も"),
            Annotation::plain("ち"),
            Annotation::ruby("帰", "かえ"),
            Annotation::plain("り"),
        ];
        assert_eq!(to_bracket(&mochi), "持[も]ち 帰[かえ]り");
    }

    #[test]
    fn test_bracket_reads_back() {
        let ocha = vec![Annotation::plain("お"), Annotation::ruby("茶", "ちゃ")];
        assert_eq!(libkana_core::extract_reading_kana(&to_bracket(&ocha)), "おちゃ");
    }

    #[test]
    fn test_text() {
        assert_eq!(to_text(&taberu()), "食(た)べる");
    }

    #[test]
    fn test_json() {
        assert_eq!(
            to_json(&taberu()).unwrap(),
            r#"[{"kind":"ruby","text":"食","rubyText":"た"},{"kind":"plain","text":"べる"}]"#
        );
    }

    #[test]
    fn test_render_dispatch() {
        let config = FuriganaConfig::default();
        assert_eq!(
            render(&taberu(), RenderFormat::Text, &config).unwrap(),
            "食(た)べる"
        );
        assert!(render(&taberu(), RenderFormat::Html, &config)
            .unwrap()
            .contains("<rp>"));
    }

    #[test]
    fn test_render_notes() {
        let config = FuriganaConfig::default();
        assert_eq!(render_notes("", RenderFormat::Text, &config), "-");
        assert_eq!(
            render_notes("a<br>b &amp; c", RenderFormat::Html, &config),
            "a<br>b &amp; c"
        );
        assert_eq!(render_notes("a<br>b", RenderFormat::Text, &config), "a\nb");
    }
}
