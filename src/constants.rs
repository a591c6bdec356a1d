#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Shown instead of a reference key when no usable answers were found.
pub const NO_REFERENCE_ANSWERS: &str = "No reference answers found.";

/// Displayed in place of a student's token when a question was left
/// unanswered.
pub const UNANSWERED: &str = "—";

/// Feedback emitted when every reference question was answered correctly.
pub const ALL_CORRECT: &str = "Great job — all correct!";

/// Lead-in for brief feedback that lists mismatches.
pub const KEEP_GOING: &str = "Keep going. Check these: ";

/// The single tip appended to brief feedback.
pub const BRIEF_TIP: &str = "Tip: match section numbering (Teil), read each stem carefully, and \
                             watch umlauts (ä/ö/ü).";

/// Tips appended to summary feedback until it is long enough.
pub const SUMMARY_TIPS: [&str; 3] = [
    "Slow down, read each stem fully, and match letters carefully.",
    "Use umlauts (ä/ö/ü) and verify meaning before choosing.",
    "Underline keywords, compare similar options, and double-check B/C confusions.",
];

/// Lower word bound for summary feedback.
pub const SUMMARY_MIN_WORDS: usize = 40;

/// Upper word bound for summary feedback.
pub const SUMMARY_MAX_WORDS: usize = 60;

/// Number of mismatches listed in summary feedback unless configured otherwise.
pub const SUMMARY_MISMATCH_LIMIT: usize = 6;

/// Reference format that is marked deterministically.
pub const OBJECTIVE_FORMAT: &str = "objective";

/// Reference format used when a row does not declare one.
pub const DEFAULT_FORMAT: &str = "essay";
