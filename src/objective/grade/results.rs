#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use bon::Builder;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::types::QuestionNumber;

#[derive(Tabled, Clone, Debug, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
/// A reference question the student did not answer correctly
pub struct Mismatch {
    #[tabled(rename = "Question")]
    /// * `question_number`: the question that was missed
    pub question_number:  QuestionNumber,
    #[tabled(rename = "Expected")]
    /// * `expected_display`: the reference answer as stored
    pub expected_display: String,
    #[tabled(rename = "You wrote")]
    /// * `student_display`: the student's token as written, or a dash when
    ///   unanswered
    pub student_display:  String,
}

impl Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}→{} (you wrote {})",
            self.question_number, self.expected_display, self.student_display
        )
    }
}

/// The outcome of marking one submission against an answer key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Percentage score, `0..=100`.
    pub score:      u8,
    /// Number of questions answered correctly.
    pub correct:    usize,
    /// Number of reference questions, never less than `1`.
    pub total:      usize,
    /// Missed questions in ascending order.
    pub mismatches: Vec<Mismatch>,
}

impl ScoreResult {
    /// The result for an answer key without usable entries.
    pub fn empty_reference() -> Self {
        Self {
            score:      0,
            correct:    0,
            total:      1,
            mismatches: Vec::new(),
        }
    }

    /// Whether every reference question was answered correctly.
    pub fn all_correct(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl Display for ScoreResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} ({}%)", self.correct, self.total, self.score)
    }
}

/// Score and feedback as shown to the student.
///
/// Deterministic marking and the external marker both produce this shape, so
/// callers can treat the two paths alike.
#[derive(Clone, Debug, Default, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(on(String, into))]
pub struct MarkOutcome {
    /// Percentage score, `0..=100`.
    pub score:    u8,
    /// Feedback text.
    pub feedback: String,
}
