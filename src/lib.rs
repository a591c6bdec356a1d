//! # objmark
//!
//! Deterministic marking of objective answers. Messy free-form submissions
//! like `"1 A, 2) Uhr, Q3=ja"` are parsed into per-question tokens, normalized
//! (case, German umlauts, yes/no synonyms, punctuation) and compared against a
//! reference key to produce a score and feedback.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Marking configuration
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Parsing, normalization, reference keys and scoring of objective answers
pub mod objective;
/// Shared primitive types
pub mod types;
/// Utility functions for convenience
pub mod util;

pub use config::MarkingConfig;
pub use objective::{
    MarkOutcome, ReferenceAnswerMap, ScoreResult, StudentAnswerMap, normalize, objective_mark,
    parse, score,
};
pub use types::QuestionNumber;
