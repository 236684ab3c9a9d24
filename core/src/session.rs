//! Study screen state machine.
//!
//! The study screen moves between three states:
//!
//! - `Question`: a card is shown and the learner types an answer
//! - `Result`: the answer was graded and the verdict is on screen
//! - `LessonStudy`: a chunk of new cards is browsed before its quiz
//!
//! `transition` is a pure function from `(state, event)` to the next state
//! plus a list of `Command`s. Network calls are never made here; the
//! platform performs `FetchNextCard`, `SubmitAnswer`, `Undo` and
//! `StartLessonQuiz` and feeds the responses back in as events.
//!
//! `StudySession` is the stateful driver the platform holds on to. It keeps
//! the current state together with the display-only bits (progress bar,
//! deck label, hint line) that commands update.

use crate::card::StudyCard;
use crate::records::{AckRecord, GradeRecord, LessonCard, NextCardRecord, Prompt};
use crate::ruby::{annotate, Annotation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const RESULT_HINT: &str = "Press Enter to continue - Backspace/Ctrl+Z to undo";

/// Progress counters as reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub remaining: u32,
    pub total: u32,
    pub completed: u32,
}

impl Progress {
    pub fn new(remaining: u32, total: u32, completed: u32) -> Self {
        Self {
            remaining,
            total,
            completed,
        }
    }

    /// Share of the session already done, clamped to 0..=100.
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        let done = self.total.saturating_sub(self.remaining) as f32;
        (done / self.total as f32 * 100.0).clamp(0.0, 100.0)
    }

    /// Counter line, e.g. "Left 3 | Done 2".
    pub fn label(&self) -> String {
        format!("Left {} | Done {}", self.remaining, self.completed)
    }
}

/// A question is on screen (or the session is finished).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Question {
    pub card: Option<StudyCard>,
    pub prompt: Prompt,
    /// No cards left in this session
    pub finished: bool,
}

/// The last answer has been graded.
#[derive(Debug, Clone, PartialEq)]
pub struct Graded {
    pub card: StudyCard,
    pub prompt: Prompt,
    pub correct: bool,
    /// Model answer shown in the result strip
    pub answer_text: String,
    /// Big text: the card front, or the expected reading after a miss
    pub headline: String,
}

/// Browsing a chunk of lesson cards.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonStudy {
    pub chunk: Vec<LessonCard>,
    pub index: usize,
}

impl LessonStudy {
    pub fn current(&self) -> Option<&LessonCard> {
        self.chunk.get(self.index)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.chunk.len()
    }

    /// "Card 2 of 5"
    pub fn position_hint(&self) -> String {
        format!("Card {} of {}", self.index + 1, self.chunk.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StudyState {
    Question(Question),
    Result(Graded),
    LessonStudy(LessonStudy),
}

impl Default for StudyState {
    fn default() -> Self {
        StudyState::Question(Question::default())
    }
}

impl StudyState {
    /// Main text on screen.
    pub fn headline(&self) -> String {
        match self {
            StudyState::Question(q) if q.finished => "Done!".to_string(),
            StudyState::Question(q) => q
                .card
                .as_ref()
                .map(|c| non_empty_or_dash(&c.front))
                .unwrap_or_else(|| "-".to_string()),
            StudyState::Result(g) => g.headline.clone(),
            StudyState::LessonStudy(l) => l
                .current()
                .map(|c| non_empty_or_dash(&c.front))
                .unwrap_or_else(|| "-".to_string()),
        }
    }

    /// Mode label above the headline.
    pub fn mode_label(&self) -> &'static str {
        match self {
            StudyState::Question(q) => q.prompt.label(),
            StudyState::Result(g) => g.prompt.label(),
            StudyState::LessonStudy(_) => "Lessons",
        }
    }

    /// Prompt the answer field is collecting, if answers are accepted.
    pub fn answer_prompt(&self) -> Option<Prompt> {
        match self {
            StudyState::Question(q) if q.card.is_some() && !q.finished => Some(q.prompt),
            _ => None,
        }
    }

    /// Card whose front is on screen, if any.
    pub fn card(&self) -> Option<&StudyCard> {
        match self {
            StudyState::Question(q) => q.card.as_ref(),
            StudyState::Result(g) => Some(&g.card),
            StudyState::LessonStudy(_) => None,
        }
    }

    /// Furigana for the card on screen. Shown once the answer is graded, and
    /// always for lesson cards.
    pub fn furigana(&self) -> Option<Vec<Annotation>> {
        match self {
            StudyState::Question(_) => None,
            StudyState::Result(g) => Some(g.card.furigana()),
            StudyState::LessonStudy(l) => l.current().map(|c| annotate(&c.front, &c.reading)),
        }
    }
}

/// Input to the state machine: user actions and service responses.
#[derive(Debug, Clone, PartialEq)]
pub enum StudyEvent {
    /// Enter key or the submit arrow, with the answer field's content
    Enter { answer: String },
    Backspace,
    /// Ctrl+Z / Cmd+Z
    UndoCombo,
    LessonPrev,
    LessonNext,
    LessonStartQuiz,
    CardLoaded(NextCardRecord),
    AnswerGraded(GradeRecord),
    UndoApplied(AckRecord),
    QuizStarted(AckRecord),
    /// The request never produced a response
    RequestFailed(Request),
}

/// Requests the platform sends on the machine's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    NextCard,
    Answer,
    Undo,
    StartQuiz,
}

impl Request {
    fn network_hint(self) -> &'static str {
        match self {
            Request::NextCard => "Network/server error. Press Enter to retry.",
            Request::Answer => "Network/server error. Press Enter to retry.",
            Request::Undo => "Undo failed (network).",
            Request::StartQuiz => "Network/server error. Could not start quiz.",
        }
    }
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchNextCard,
    SubmitAnswer { card_id: i64, answer: String },
    Undo,
    StartLessonQuiz,
    ShowHint(String),
    SetProgress(Progress),
    SetDeck(String),
}

impl Command {
    /// Whether the platform must talk to the service for this command.
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Command::FetchNextCard
                | Command::SubmitAnswer { .. }
                | Command::Undo
                | Command::StartLessonQuiz
        )
    }
}

/// Compute the next state and the commands it implies.
pub fn transition(state: StudyState, event: StudyEvent) -> (StudyState, Vec<Command>) {
    let mut commands = Vec::new();

    let next = match (state, event) {
        (state, StudyEvent::CardLoaded(rec)) => card_loaded(state, rec, &mut commands),

        (StudyState::Question(q), StudyEvent::Enter { answer }) => {
            if let (Some(card), false) = (&q.card, q.finished) {
                commands.push(Command::SubmitAnswer {
                    card_id: card.card_id,
                    answer: answer.trim().to_string(),
                });
            }
            StudyState::Question(q)
        }
        (StudyState::Result(g), StudyEvent::Enter { .. }) => {
            commands.push(Command::FetchNextCard);
            StudyState::Result(g)
        }
        (StudyState::LessonStudy(l), StudyEvent::Enter { .. } | StudyEvent::LessonNext)
            if !l.is_last() =>
        {
            let l = LessonStudy {
                index: l.index + 1,
                ..l
            };
            commands.push(Command::ShowHint(l.position_hint()));
            StudyState::LessonStudy(l)
        }
        (StudyState::LessonStudy(l), StudyEvent::Enter { .. } | StudyEvent::LessonStartQuiz) => {
            commands.push(Command::StartLessonQuiz);
            StudyState::LessonStudy(l)
        }
        (StudyState::LessonStudy(l), StudyEvent::Backspace | StudyEvent::LessonPrev)
            if l.index > 0 =>
        {
            let l = LessonStudy {
                index: l.index - 1,
                ..l
            };
            commands.push(Command::ShowHint(l.position_hint()));
            StudyState::LessonStudy(l)
        }

        (StudyState::Result(g), StudyEvent::Backspace | StudyEvent::UndoCombo) => {
            commands.push(Command::Undo);
            StudyState::Result(g)
        }

        (StudyState::Question(q), StudyEvent::AnswerGraded(rec)) => match rec.failure() {
            Some(err) => {
                commands.push(Command::ShowHint(or_default(
                    err,
                    "Server error. Press Enter to retry.",
                )));
                StudyState::Question(q)
            }
            None => match q.card {
                Some(card) => graded(card, q.prompt, &rec, &mut commands),
                None => StudyState::Question(q),
            },
        },

        (state, StudyEvent::UndoApplied(ack)) => {
            ack_then_fetch(&ack, "Undo failed.", &mut commands);
            state
        }
        (state, StudyEvent::QuizStarted(ack)) => {
            ack_then_fetch(&ack, "Could not start lesson quiz.", &mut commands);
            state
        }
        (state, StudyEvent::RequestFailed(request)) => {
            warn!(?request, "study service request failed");
            commands.push(Command::ShowHint(request.network_hint().to_string()));
            state
        }

        (state, event) => {
            debug!(?event, "event ignored in current state");
            state
        }
    };

    (next, commands)
}

fn card_loaded(state: StudyState, rec: NextCardRecord, commands: &mut Vec<Command>) -> StudyState {
    if let Some(err) = rec.failure() {
        commands.push(Command::ShowHint(or_default(err, "Server error.")));
        return state;
    }

    if let Some(deck) = rec.deck.as_deref().filter(|d| !d.is_empty()) {
        commands.push(Command::SetDeck(deck.to_string()));
    }

    if rec.done {
        commands.push(Command::SetProgress(Progress::new(0, rec.total, rec.completed)));
        return StudyState::Question(Question {
            card: None,
            prompt: Prompt::Reading,
            finished: true,
        });
    }

    commands.push(Command::SetProgress(Progress::new(
        rec.remaining,
        rec.total,
        rec.completed,
    )));

    if rec.is_lesson_study() {
        let lesson = LessonStudy {
            chunk: rec.chunk,
            index: 0,
        };
        if !lesson.chunk.is_empty() {
            commands.push(Command::ShowHint(lesson.position_hint()));
        }
        return StudyState::LessonStudy(lesson);
    }

    let prompt = rec.prompt();
    if rec.card.is_none() {
        commands.push(Command::ShowHint("Server error.".to_string()));
    }
    StudyState::Question(Question {
        card: rec.card,
        prompt,
        finished: false,
    })
}

fn graded(
    card: StudyCard,
    prompt: Prompt,
    rec: &GradeRecord,
    commands: &mut Vec<Command>,
) -> StudyState {
    let model = rec.model_answer();
    let answer_text = model
        .unwrap_or(if rec.correct { "OK" } else { "..." })
        .to_string();
    let headline = match (rec.correct, prompt, model) {
        (false, Prompt::Reading, Some(expected)) => expected.to_string(),
        _ => non_empty_or_dash(&card.front),
    };

    commands.push(Command::ShowHint(RESULT_HINT.to_string()));
    commands.push(Command::SetProgress(Progress::new(
        rec.remaining,
        rec.total,
        rec.completed,
    )));

    StudyState::Result(Graded {
        card,
        prompt,
        correct: rec.correct,
        answer_text,
        headline,
    })
}

fn ack_then_fetch(ack: &AckRecord, fallback: &str, commands: &mut Vec<Command>) {
    match ack.failure() {
        Some(err) => commands.push(Command::ShowHint(or_default(err, fallback))),
        None => commands.push(Command::FetchNextCard),
    }
}

fn or_default(err: &str, fallback: &str) -> String {
    if err.is_empty() {
        fallback.to_string()
    } else {
        err.to_string()
    }
}

fn non_empty_or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

/// Stateful driver around `transition`.
#[derive(Debug, Clone, Default)]
pub struct StudySession {
    state: StudyState,
    progress: Progress,
    deck: Option<String>,
    hint: Option<String>,
}

impl StudySession {
    /// Create a new session in the empty question state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands to issue when the screen opens.
    pub fn start(&self) -> Vec<Command> {
        vec![Command::FetchNextCard]
    }

    /// Feed one event; returns every command produced. Display commands
    /// are already applied to the session when this returns.
    pub fn handle(&mut self, event: StudyEvent) -> Vec<Command> {
        let state = std::mem::take(&mut self.state);
        let (next, commands) = transition(state, event);
        self.state = next;

        if commands.iter().any(Command::is_request) {
            self.hint = None;
        }
        for cmd in &commands {
            match cmd {
                Command::ShowHint(text) => self.hint = Some(text.clone()),
                Command::SetProgress(p) => self.progress = *p,
                Command::SetDeck(d) => self.deck = Some(d.clone()),
                _ => {}
            }
        }
        commands
    }

    pub fn state(&self) -> &StudyState {
        &self.state
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn deck(&self) -> Option<&str> {
        self.deck.as_deref()
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: i64) -> StudyCard {
        StudyCard::from_fields(id, "食べる", "食[た]べる", "to eat")
    }

    fn question(prompt: Prompt) -> StudyState {
        StudyState::Question(Question {
            card: Some(card(1)),
            prompt,
            finished: false,
        })
    }

    #[test]
    fn test_progress() {
        assert_eq!(Progress::new(3, 0, 0).percent(), 0.0);
        assert_eq!(Progress::new(1, 4, 3).percent(), 75.0);
        assert_eq!(Progress::new(9, 4, 0).percent(), 0.0);
        assert_eq!(Progress::new(3, 5, 2).label(), "Left 3 | Done 2");
    }

    #[test]
    fn test_enter_submits_trimmed_answer() {
        let (state, cmds) = transition(
            question(Prompt::Reading),
            StudyEvent::Enter {
                answer: "  たべる ".into(),
            },
        );
        assert!(matches!(state, StudyState::Question(_)));
        assert_eq!(
            cmds,
            vec![Command::SubmitAnswer {
                card_id: 1,
                answer: "たべる".into()
            }]
        );
    }

    #[test]
    fn test_enter_without_card_does_nothing() {
        let (state, cmds) = transition(
            StudyState::default(),
            StudyEvent::Enter {
                answer: "x".into(),
            },
        );
        assert_eq!(state, StudyState::default());
        assert!(cmds.is_empty());
    }

    #[test]
    fn test_wrong_reading_shows_expected_headline() {
        let rec = GradeRecord {
            correct: false,
            expected: Some("たべる".into()),
            remaining: 2,
            total: 3,
            ..Default::default()
        };
        let (state, cmds) = transition(question(Prompt::Reading), StudyEvent::AnswerGraded(rec));
        match &state {
            StudyState::Result(g) => {
                assert!(!g.correct);
                assert_eq!(g.headline, "たべる");
                assert_eq!(g.answer_text, "たべる");
            }
            other => panic!("unexpected state {:?}", other),
        }
        assert!(cmds.contains(&Command::ShowHint(RESULT_HINT.to_string())));
        assert!(cmds.contains(&Command::SetProgress(Progress::new(2, 3, 0))));
        assert!(state.furigana().is_some());
    }

    #[test]
    fn test_wrong_meaning_keeps_front() {
        let rec = GradeRecord {
            correct: false,
            expected: Some("to eat".into()),
            ..Default::default()
        };
        let (state, _) = transition(question(Prompt::Meaning), StudyEvent::AnswerGraded(rec));
        assert_eq!(state.headline(), "食べる");
    }

    #[test]
    fn test_correct_without_model_answer() {
        let rec = GradeRecord {
            correct: true,
            ..Default::default()
        };
        let (state, _) = transition(question(Prompt::Meaning), StudyEvent::AnswerGraded(rec));
        match state {
            StudyState::Result(g) => assert_eq!(g.answer_text, "OK"),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_grading_failure_hints() {
        let rec = GradeRecord {
            ok: Some(false),
            ..Default::default()
        };
        let (state, cmds) = transition(question(Prompt::Reading), StudyEvent::AnswerGraded(rec));
        assert!(matches!(state, StudyState::Question(_)));
        assert_eq!(
            cmds,
            vec![Command::ShowHint("Server error. Press Enter to retry.".into())]
        );
    }

    #[test]
    fn test_result_keys() {
        let rec = GradeRecord {
            correct: true,
            ..Default::default()
        };
        let (result, _) = transition(question(Prompt::Reading), StudyEvent::AnswerGraded(rec));

        let (_, cmds) = transition(result.clone(), StudyEvent::Backspace);
        assert_eq!(cmds, vec![Command::Undo]);
        let (_, cmds) = transition(result.clone(), StudyEvent::UndoCombo);
        assert_eq!(cmds, vec![Command::Undo]);
        let (_, cmds) = transition(result, StudyEvent::Enter { answer: String::new() });
        assert_eq!(cmds, vec![Command::FetchNextCard]);
    }

    #[test]
    fn test_undo_combo_ignored_in_question() {
        let (state, cmds) = transition(question(Prompt::Reading), StudyEvent::UndoCombo);
        assert!(cmds.is_empty());
        assert_eq!(state, question(Prompt::Reading));
    }

    #[test]
    fn test_lesson_navigation_bounds() {
        let lesson = StudyState::LessonStudy(LessonStudy {
            chunk: vec![LessonCard::default(), LessonCard::default()],
            index: 0,
        });

        let (state, cmds) = transition(lesson.clone(), StudyEvent::LessonPrev);
        assert_eq!(state, lesson);
        assert!(cmds.is_empty());

        let (state, cmds) = transition(lesson, StudyEvent::Enter { answer: String::new() });
        assert_eq!(cmds, vec![Command::ShowHint("Card 2 of 2".into())]);

        let (state2, cmds) = transition(state.clone(), StudyEvent::LessonNext);
        assert_eq!(state2, state);
        assert!(cmds.is_empty());

        let (_, cmds) = transition(state.clone(), StudyEvent::Enter { answer: String::new() });
        assert_eq!(cmds, vec![Command::StartLessonQuiz]);

        let (back, cmds) = transition(state, StudyEvent::Backspace);
        assert_eq!(cmds, vec![Command::ShowHint("Card 1 of 2".into())]);
        assert!(matches!(back, StudyState::LessonStudy(LessonStudy { index: 0, .. })));
    }

    #[test]
    fn test_ack_events() {
        let ok = AckRecord {
            ok: Some(true),
            ..Default::default()
        };
        let (_, cmds) = transition(StudyState::default(), StudyEvent::UndoApplied(ok.clone()));
        assert_eq!(cmds, vec![Command::FetchNextCard]);
        let (_, cmds) = transition(StudyState::default(), StudyEvent::QuizStarted(ok));

        assert_eq!(cmds, vec![Command::FetchNextCard]);
        let failed = AckRecord {
            ok: Some(false),
            ..Default::default()
        };
        let (_, cmds) = transition(StudyState::default(), StudyEvent::QuizStarted(failed));
        assert_eq!(cmds, vec![Command::ShowHint("Could not start lesson quiz.".into())]);
    }

    #[test]
    fn test_request_failure_hint() {
        let (_, cmds) = transition(StudyState::default(), StudyEvent::RequestFailed(Request::Undo));
        assert_eq!(cmds, vec![Command::ShowHint("Undo failed (network).".into())]);
    }

    #[test]
    fn test_session_applies_display_commands() {
        let mut session = StudySession::new();
        assert_eq!(session.start(), vec![Command::FetchNextCard]);

        let rec = NextCardRecord {
            card: Some(card(9)),
            prompt: Some("reading".into()),
            remaining: 5,
            total: 5,
            deck: Some("Core".into()),
            ..Default::default()
        };
        session.handle(StudyEvent::CardLoaded(rec));
        assert_eq!(session.deck(), Some("Core"));
        assert_eq!(session.progress(), Progress::new(5, 5, 0));
        assert_eq!(session.state().answer_prompt(), Some(Prompt::Reading));
        assert_eq!(session.state().headline(), "食べる");

        session.handle(StudyEvent::RequestFailed(Request::Answer));
        assert!(session.hint().is_some());
        let cmds = session.handle(StudyEvent::Enter {
            answer: "たべる".into(),
        });
        assert!(cmds[0].is_request());
        assert_eq!(session.hint(), None);
    }

    #[test]
    fn test_done_record_finishes() {
        let mut session = StudySession::new();
        session.handle(StudyEvent::CardLoaded(NextCardRecord {
            done: true,
            total: 4,
            completed: 4,
            remaining: 2,
            ..Default::default()
        }));
        assert_eq!(session.state().headline(), "Done!");
        assert_eq!(session.state().answer_prompt(), None);
        assert_eq!(session.progress(), Progress::new(0, 4, 4));
    }
}
