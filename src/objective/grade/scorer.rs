#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use super::results::{Mismatch, ScoreResult};
use crate::{
    constants::UNANSWERED,
    objective::{normalize::normalize, parser::StudentAnswerMap, reference::ReferenceAnswerMap},
};

/// `round(100 * correct / total)` with halves rounded up, in integer
/// arithmetic so results never depend on float formatting.
fn percentage(correct: usize, total: usize) -> u8 {
    let total = total.max(1);
    let rounded = (200 * correct + total) / (2 * total);
    u8::try_from(rounded.min(100)).unwrap_or(100)
}

/// Compares a student's answers with the reference key.
///
/// Questions are visited in ascending order. A question counts as correct
/// only when the student's canonical token is non-empty and equal to the
/// canonical reference token; every other question is reported as a
/// [`Mismatch`]. Student answers to questions missing from the key are
/// ignored.
pub fn score(reference: &ReferenceAnswerMap, student: &StudentAnswerMap) -> ScoreResult {
    if reference.is_empty() {
        return ScoreResult::empty_reference();
    }

    let total = reference.len();
    let mut correct = 0;
    let mut mismatches = Vec::new();

    for (q, expected) in reference.iter() {
        let expected_canonical = normalize(expected);
        let student_canonical = student.canonical(q);

        if !student_canonical.is_empty() && student_canonical == expected_canonical {
            correct += 1;
        } else {
            mismatches.push(
                Mismatch::builder()
                    .question_number(q)
                    .expected_display(expected)
                    .student_display(student.raw(q).unwrap_or(UNANSWERED))
                    .build(),
            );
        }
    }

    tracing::debug!("{correct} of {total} objective answers correct");

    ScoreResult {
        score: percentage(correct, total),
        correct,
        total,
        mismatches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::parser::parse;

    #[test]
    fn rounds_halves_up() {
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn empty_expected_never_matches_blank_answer() {
        let reference: ReferenceAnswerMap = [(1, "?")].into_iter().collect();
        let result = score(&reference, &parse(""));
        assert_eq!(result.correct, 0);
        assert_eq!(result.mismatches[0].student_display, UNANSWERED);
    }

    #[test]
    fn extra_student_answers_are_ignored() {
        let reference: ReferenceAnswerMap = [(1, "A")].into_iter().collect();
        let result = score(&reference, &parse("1 A 2 B 3 C"));
        assert_eq!((result.correct, result.total, result.score), (1, 1, 100));
    }
}
