use std::cell::RefCell;

use anyhow::{Result, bail};
use objmark::{
    MarkingConfig,
    objective::{
        AnswerFormat, ExternalMarker, MarkOutcome, MarkRequest, ReferenceKey, mark_submission,
    },
};

/// Replays a canned reply and remembers what it was asked.
struct CannedMarker {
    reply: Option<String>,
    seen:  RefCell<Vec<MarkRequest>>,
}

impl CannedMarker {
    fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            seen:  RefCell::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            reply: None,
            seen:  RefCell::new(Vec::new()),
        }
    }
}

impl ExternalMarker for CannedMarker {
    fn mark(&self, request: &MarkRequest) -> Result<String> {
        self.seen.borrow_mut().push(request.clone());
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => bail!("service unavailable"),
        }
    }
}

fn key(format: AnswerFormat) -> ReferenceKey {
    ReferenceKey {
        answers: [(1, "Ich heiße Anna."), (2, "B")].into_iter().collect(),
        link:    String::new(),
        format,
    }
}

#[test]
fn objective_keys_never_reach_the_marker() {
    let marker = CannedMarker::replying(r#"{"score": 5, "feedback": "nope"}"#);
    let outcome = mark_submission(
        &key(AnswerFormat::Objective),
        "1 x 2 b",
        "A1",
        &MarkingConfig::default(),
        Some(&marker),
    );

    assert_eq!(outcome.map(|o| o.score), Some(50));
    assert!(marker.seen.borrow().is_empty());
}

#[test]
fn other_formats_are_sent_to_the_marker() {
    let marker = CannedMarker::replying("Here you go: {\"score\": 72, \"feedback\": \"Gut.\"}");
    let outcome = mark_submission(
        &key(AnswerFormat::Essay),
        "Ich heiße Anna.",
        "A1",
        &MarkingConfig::default(),
        Some(&marker),
    );

    assert_eq!(outcome, Some(MarkOutcome::builder().score(72).feedback("Gut.").build()));

    let seen = marker.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].student_text, "Ich heiße Anna.");
    assert_eq!(seen[0].reference_text, "1. Ich heiße Anna.\n2. B");
    assert_eq!(seen[0].level, "A1");
}

#[test]
fn missing_or_failing_marker_gives_nothing() {
    let essay = key(AnswerFormat::Essay);
    let config = MarkingConfig::default();

    assert_eq!(mark_submission(&essay, "text", "A1", &config, None), None);

    let failing = CannedMarker::failing();
    assert_eq!(mark_submission(&essay, "text", "A1", &config, Some(&failing)), None);
    assert_eq!(failing.seen.borrow().len(), 1);

    let garbled = CannedMarker::replying("I could not mark this.");
    assert_eq!(mark_submission(&essay, "text", "A1", &config, Some(&garbled)), None);
}
