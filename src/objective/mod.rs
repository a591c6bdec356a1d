#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Scoring, feedback and the external marking contract.
pub mod grade;
/// Token canonicalization.
pub mod normalize;
/// Free-form answer parsing.
pub mod parser;
/// Reference answer keys and the documents they come from.
pub mod reference;
/// Renumbering of submissions split into `Teil` sections.
pub mod sections;

pub use grade::{
    ExternalMarker, FeedbackStyle, MarkOutcome, MarkRequest, Mismatch, ScoreResult, feedback,
    mark_submission, objective_mark, parse_marker_reply, score,
};
pub use normalize::{CanonicalToken, normalize};
pub use parser::{StudentAnswer, StudentAnswerMap, parse};
pub use reference::{
    AnswerFormat, AnswersDictionary, ReferenceAnswerMap, ReferenceKey, ReferenceSection,
    ReferenceSource, SourceError, build,
};
pub use sections::globalize;
