// core/tests/study_flow.rs
//
// End-to-end runs of the study state machine, driven with JSON records the
// way the service sends them.
//
// Tests cover:
// - Review loop: load, answer, grade, continue
// - Miss, undo, reload
// - Lesson chunk browsing followed by the quiz
// - Answer field kana conversion tied to the current prompt

use libkana_core::{
    AckRecord, AnswerField, Command, GradeRecord, NextCardRecord, Prompt, StudyEvent,
    StudySession, StudyState,
};

fn next(json: &str) -> StudyEvent {
    StudyEvent::CardLoaded(NextCardRecord::from_json(json).expect("next-card json"))
}

fn grade(json: &str) -> StudyEvent {
    StudyEvent::AnswerGraded(GradeRecord::from_json(json).expect("grade json"))
}

const CARD_JSON: &str = r#"{
    "done": false,
    "card": {"cardId": 42, "front": "飲み物", "reading": "のみもの",
             "readingUI": "飲み物 (のみもの)", "notes": "drink<br>beverage"},
    "prompt": "reading",
    "remaining": 3, "completed": 0, "total": 3,
    "mode": "reviews", "deck": "Japanese Review"
}"#;

#[test]
fn review_loop() {
    let mut session = StudySession::new();
    assert_eq!(session.start(), vec![Command::FetchNextCard]);

    session.handle(next(CARD_JSON));
    assert_eq!(session.state().headline(), "飲み物");
    assert_eq!(session.state().mode_label(), "Reading");
    assert_eq!(session.deck(), Some("Japanese Review"));

    let cmds = session.handle(StudyEvent::Enter {
        answer: "のみもの".into(),
    });
    assert_eq!(
        cmds,
        vec![Command::SubmitAnswer {
            card_id: 42,
            answer: "のみもの".into()
        }]
    );

    session.handle(grade(
        r#"{"ok": true, "correct": true, "prompt": "reading",
            "expected": "のみもの", "ideal": "飲み物 (のみもの)",
            "remaining": 3, "completed": 0, "total": 3}"#,
    ));
    match session.state() {
        StudyState::Result(g) => {
            assert!(g.correct);
            assert_eq!(g.answer_text, "飲み物 (のみもの)");
        }
        other => panic!("expected result state, got {:?}", other),
    }

    let furigana = session.state().furigana().expect("furigana on result");
    let rubies: Vec<_> = furigana.iter().filter_map(|a| a.ruby_text()).collect();
    assert_eq!(rubies, vec!["の", "もの"]);

    let cmds = session.handle(StudyEvent::Enter {
        answer: String::new(),
    });
    assert_eq!(cmds, vec![Command::FetchNextCard]);
}

#[test]
fn miss_then_undo() {
    let mut session = StudySession::new();
    session.handle(next(CARD_JSON));
    session.handle(grade(
        r#"{"ok": true, "correct": false, "expected": "のみもの",
            "remaining": 3, "completed": 0, "total": 3}"#,
    ));
    assert_eq!(session.state().headline(), "のみもの");

    let cmds = session.handle(StudyEvent::Backspace);
    assert_eq!(cmds, vec![Command::Undo]);

    let cmds = session.handle(StudyEvent::UndoApplied(
        AckRecord::from_json(r#"{"ok": true, "remaining": 3, "completed": 0, "total": 3}"#)
            .expect("ack json"),
    ));
    assert_eq!(cmds, vec![Command::FetchNextCard]);

    session.handle(next(CARD_JSON));
    assert_eq!(session.state().answer_prompt(), Some(Prompt::Reading));
}

#[test]
fn lesson_chunk_then_quiz() {
    let mut session = StudySession::new();
    session.handle(next(
        r#"{"done": false, "mode": "lessons", "lessonPhase": "study",
            "chunk": [
                {"cardId": 1, "front": "水", "reading": "みず", "meanings": ["water"]},
                {"cardId": 2, "front": "火", "reading": "ひ", "meanings": ["fire"]}
            ],
            "remaining": 2, "completed": 0, "total": 2}"#,
    ));
    assert_eq!(session.state().mode_label(), "Lessons");
    assert_eq!(session.hint(), Some("Card 1 of 2"));
    assert_eq!(session.state().headline(), "水");

    session.handle(StudyEvent::LessonNext);
    assert_eq!(session.state().headline(), "火");
    assert_eq!(session.hint(), Some("Card 2 of 2"));

    let cmds = session.handle(StudyEvent::Enter {
        answer: String::new(),
    });
    assert_eq!(cmds, vec![Command::StartLessonQuiz]);

    let cmds = session.handle(StudyEvent::QuizStarted(AckRecord {
        ok: Some(true),
        ..Default::default()
    }));
    assert_eq!(cmds, vec![Command::FetchNextCard]);
}

#[test]
fn server_error_record_keeps_state() {
    let mut session = StudySession::new();
    session.handle(next(CARD_JSON));
    let before = session.state().clone();
    session.handle(next(r#"{"ok": false, "error": "/next failed: timeout"}"#));
    assert_eq!(session.state(), &before);
    assert_eq!(session.hint(), Some("/next failed: timeout"));
}

#[test]
fn answer_field_follows_prompt() {
    let to_kana = |input: &str| input.replace("mizu", "みず");
    let mut session = StudySession::new();
    let mut field = AnswerField::new(true);

    session.handle(next(CARD_JSON));
    field.set_prompt(session.state().answer_prompt());
    assert!(field.on_input("mizu", &to_kana));
    assert_eq!(field.text(), "みず");

    session.handle(next(&CARD_JSON.replace(r#""prompt": "reading""#, r#""prompt": "meaning""#)));
    field.set_prompt(session.state().answer_prompt());
    assert!(!field.on_input("mizu", &to_kana));
    assert_eq!(field.text(), "mizu");
}
