//! Wire records exchanged with the study-session service.
//!
//! The service answers every request with a flat JSON object in camelCase.
//! Failures are reported in-band as `{"ok": false, "error": "..."}`. Every
//! field is optional on the wire, so all records default missing fields.

use crate::card::StudyCard;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Which side of a card the learner must answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prompt {
    #[default]
    Reading,
    Meaning,
}

impl Prompt {
    /// Parse the service's prompt string; anything but "meaning" is a
    /// reading prompt.
    pub fn from_wire(s: Option<&str>) -> Self {
        match s {
            Some("meaning") => Prompt::Meaning,
            _ => Prompt::Reading,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Prompt::Reading => "Reading",
            Prompt::Meaning => "Meaning",
        }
    }

    /// Placeholder text for the answer field.
    pub fn placeholder(self) -> &'static str {
        match self {
            Prompt::Reading => "Your Response (kana)",
            Prompt::Meaning => "Your Response",
        }
    }
}

/// A card shown during the lesson study phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonCard {
    pub card_id: i64,
    pub front: String,
    pub reading: String,
    pub meanings: Vec<String>,
}

/// Response to "give me the next card".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NextCardRecord {
    pub ok: Option<bool>,
    pub error: Option<String>,
    pub done: bool,
    pub card: Option<StudyCard>,
    pub meanings: Vec<String>,
    pub prompt: Option<String>,
    pub remaining: u32,
    pub total: u32,
    pub completed: u32,
    pub mode: Option<String>,
    pub lesson_phase: Option<String>,
    pub chunk: Vec<LessonCard>,
    pub deck: Option<String>,
}

impl NextCardRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        parse(json, "next-card record")
    }

    /// Error message when the service reported a failure.
    pub fn failure(&self) -> Option<&str> {
        failure(self.ok, self.error.as_deref())
    }

    /// True when the service is handing out a lesson chunk to study.
    pub fn is_lesson_study(&self) -> bool {
        self.mode.as_deref() == Some("lessons") && self.lesson_phase.as_deref() == Some("study")
    }

    pub fn prompt(&self) -> Prompt {
        Prompt::from_wire(self.prompt.as_deref())
    }
}

/// Response to an answer submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradeRecord {
    pub ok: Option<bool>,
    pub error: Option<String>,
    pub correct: bool,
    pub prompt: Option<String>,
    pub expected: Option<String>,
    pub ideal: Option<String>,
    pub remaining: u32,
    pub total: u32,
    pub completed: u32,
}

impl GradeRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        parse(json, "grade record")
    }

    pub fn failure(&self) -> Option<&str> {
        failure(self.ok, self.error.as_deref())
    }

    /// The answer to show: the ideal form, else the expected one.
    pub fn model_answer(&self) -> Option<&str> {
        self.ideal
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.expected.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Bare acknowledgement (undo, start lesson quiz).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AckRecord {
    pub ok: Option<bool>,
    pub error: Option<String>,
    pub remaining: Option<u32>,
    pub total: Option<u32>,
    pub completed: Option<u32>,
}

impl AckRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        parse(json, "acknowledgement")
    }

    pub fn failure(&self) -> Option<&str> {
        failure(self.ok, self.error.as_deref())
    }
}

fn parse<T: DeserializeOwned>(json: &str, what: &str) -> Result<T> {
    serde_json::from_str(json).with_context(|| format!("failed to parse {}", what))
}

fn failure<'a>(ok: Option<bool>, error: Option<&'a str>) -> Option<&'a str> {
    match ok {
        Some(false) => Some(error.unwrap_or("")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_card_question() {
        let rec = NextCardRecord::from_json(
            r#"{
                "done": false,
                "card": {"cardId": 12, "front": "食べる", "reading": "たべる",
                         "readingUI": "食べる (たべる)", "notes": "to eat"},
                "meanings": ["to eat"],
                "prompt": "meaning",
                "remaining": 4, "completed": 1, "total": 5,
                "mode": "reviews", "deck": "Japanese Review"
            }"#,
        )
        .unwrap();
        assert!(rec.failure().is_none());
        assert!(!rec.is_lesson_study());
        assert_eq!(rec.prompt(), Prompt::Meaning);
        assert_eq!(rec.card.as_ref().map(|c| c.card_id), Some(12));
        assert_eq!(rec.deck.as_deref(), Some("Japanese Review"));
    }

    #[test]
    fn test_next_card_lesson_chunk() {
        let rec = NextCardRecord::from_json(
            r#"{"done": false, "mode": "lessons", "lessonPhase": "study",
                "chunk": [{"cardId": 1, "front": "水", "reading": "みず", "meanings": ["water"]}],
                "remaining": 10, "completed": 0, "total": 10}"#,
        )
        .unwrap();
        assert!(rec.is_lesson_study());
        assert_eq!(rec.chunk.len(), 1);
        assert_eq!(rec.chunk[0].meanings, vec!["water"]);
    }

    #[test]
    fn test_failure_in_band() {
        let rec = GradeRecord::from_json(r#"{"ok": false, "error": "Out of sync"}"#).unwrap();
        assert_eq!(rec.failure(), Some("Out of sync"));
        let ack = AckRecord::from_json(r#"{"ok": true}"#).unwrap();
        assert_eq!(ack.failure(), None);
        let ack = AckRecord::from_json(r#"{"ok": false}"#).unwrap();
        assert_eq!(ack.failure(), Some(""));
    }

    #[test]
    fn test_model_answer_preference() {
        let mut rec = GradeRecord {
            expected: Some("たべる".into()),
            ..Default::default()
        };
        assert_eq!(rec.model_answer(), Some("たべる"));
        rec.ideal = Some("食べる (たべる)".into());
        assert_eq!(rec.model_answer(), Some("食べる (たべる)"));
        rec.ideal = Some(String::new());
        assert_eq!(rec.model_answer(), Some("たべる"));
    }

    #[test]
    fn test_prompt_from_wire() {
        assert_eq!(Prompt::from_wire(Some("meaning")), Prompt::Meaning);
        assert_eq!(Prompt::from_wire(Some("reading")), Prompt::Reading);
        assert_eq!(Prompt::from_wire(Some("bogus")), Prompt::Reading);
        assert_eq!(Prompt::from_wire(None), Prompt::Reading);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = NextCardRecord::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("next-card record"));
    }
}
