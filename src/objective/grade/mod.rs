#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Contract for the external, non-deterministic marking path.
pub mod external;
/// Feedback text generation.
pub mod feedback;
/// Shared result types.
pub mod results;
/// Deterministic scoring against a reference key.
pub mod scorer;

pub use external::{ExternalMarker, MarkRequest, mark_submission, parse_marker_reply};
pub use feedback::{FeedbackStyle, brief_feedback, feedback, summary_feedback};
pub use results::{MarkOutcome, Mismatch, ScoreResult};
pub use scorer::score;

use super::{parser::parse, reference::ReferenceAnswerMap};
use crate::{config::MarkingConfig, constants::NO_REFERENCE_ANSWERS};

/// Parses, scores and writes feedback for one objective submission.
///
/// An empty reference key scores `0` with the no-reference sentinel as
/// feedback.
///
/// ```
/// use objmark::{
///     config::MarkingConfig,
///     objective::{ReferenceAnswerMap, objective_mark},
/// };
///
/// let key: ReferenceAnswerMap = [(1, "A")].into_iter().collect();
/// let outcome = objective_mark("1) a", &key, &MarkingConfig::default());
/// assert_eq!(outcome.score, 100);
/// assert_eq!(outcome.feedback, "Great job — all correct!");
/// ```
pub fn objective_mark(
    student_text: &str,
    reference: &ReferenceAnswerMap,
    config: &MarkingConfig,
) -> MarkOutcome {
    let result = score(reference, &parse(student_text));
    let feedback = if reference.is_empty() {
        NO_REFERENCE_ANSWERS.to_string()
    } else {
        feedback(&result, config.feedback_style(), config.summary_limit())
    };
    MarkOutcome {
        score: result.score,
        feedback,
    }
}
