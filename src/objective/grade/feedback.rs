#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{fmt::Display, str::FromStr, sync::LazyLock};

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::results::ScoreResult;
use crate::{
    constants::{
        ALL_CORRECT, BRIEF_TIP, KEEP_GOING, SUMMARY_MAX_WORDS, SUMMARY_MIN_WORDS, SUMMARY_TIPS,
    },
    util::count_words,
};

/// The last sentence of a text, with the whitespace before it.
static LAST_SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*[^.?!]*[.?!]\s*$").expect("last sentence regex is valid"));

/// How feedback text is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStyle {
    /// A fixed verdict, or the mismatch list followed by one tip.
    #[default]
    Brief,
    /// A 40 to 60 word paragraph with the score, up to a configured number
    /// of mismatches and study tips.
    Summary,
}

/// Raised when a feedback style name is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown feedback style `{0}`, expected `brief` or `summary`.")]
pub struct UnknownFeedbackStyle(pub String);

impl FromStr for FeedbackStyle {
    type Err = UnknownFeedbackStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brief" => Ok(Self::Brief),
            "summary" => Ok(Self::Summary),
            other => Err(UnknownFeedbackStyle(other.to_string())),
        }
    }
}

impl Display for FeedbackStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Brief => write!(f, "brief"),
            Self::Summary => write!(f, "summary"),
        }
    }
}

/// Congratulates on a clean sheet, otherwise lists every mismatch as
/// `q→expected (you wrote token)` and closes with a tip.
pub fn brief_feedback(result: &ScoreResult) -> String {
    if result.all_correct() {
        return ALL_CORRECT.to_string();
    }
    format!("{KEEP_GOING}{}. {BRIEF_TIP}", result.mismatches.iter().join(", "))
}

/// Writes a short paragraph of 40 to 60 words.
///
/// The score sentence comes first, then at most `limit` mismatches, then tips
/// until the paragraph reaches the lower bound. Trailing sentences are
/// dropped while it is over the upper bound.
pub fn summary_feedback(result: &ScoreResult, limit: usize) -> String {
    let mut pieces = vec![format!(
        "Good effort for A1 objectives—you answered {} of {} correctly.",
        result.correct, result.total
    )];
    if !result.all_correct() {
        let shown = result.mismatches.iter().take(limit).join(", ");
        pieces.push(format!("Check these items: {shown}."));
    }

    for tip in SUMMARY_TIPS {
        pieces.push(tip.to_string());
        if count_words(&pieces.join(" ")) >= SUMMARY_MIN_WORDS {
            break;
        }
    }

    let mut text = pieces.join(" ");
    for tip in SUMMARY_TIPS {
        if count_words(&text) >= SUMMARY_MIN_WORDS {
            break;
        }
        text.push(' ');
        text.push_str(tip);
    }

    while count_words(&text) > SUMMARY_MAX_WORDS {
        text = LAST_SENTENCE.replace(&text, "").trim().to_string();
        if !text.ends_with(['.', '?', '!']) {
            break;
        }
    }
    text
}

/// Renders feedback for `result` in the requested style.
pub fn feedback(result: &ScoreResult, style: FeedbackStyle, limit: usize) -> String {
    match style {
        FeedbackStyle::Brief => brief_feedback(result),
        FeedbackStyle::Summary => summary_feedback(result, limit),
    }
}
