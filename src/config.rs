#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use bon::Builder;

use crate::{
    constants::SUMMARY_MISMATCH_LIMIT,
    objective::{AnswerFormat, FeedbackStyle},
};

/// Environment variable selecting the feedback style (`brief` or `summary`).
pub const FEEDBACK_STYLE_VAR: &str = "OBJMARK_FEEDBACK_STYLE";

/// Environment variable capping the mismatches listed in summary feedback.
pub const SUMMARY_LIMIT_VAR: &str = "OBJMARK_SUMMARY_LIMIT";

/// Environment variable with the format assumed for rows that declare none.
pub const DEFAULT_FORMAT_VAR: &str = "OBJMARK_DEFAULT_FORMAT";

/// Settings for marking and feedback.
///
/// The config is an ordinary value handed to whoever marks; nothing in the
/// crate keeps one globally.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct MarkingConfig {
    /// Layout of generated feedback.
    #[builder(default)]
    feedback_style: FeedbackStyle,
    /// Maximum number of mismatches listed in summary feedback.
    #[builder(default = SUMMARY_MISMATCH_LIMIT)]
    summary_limit:  usize,
    /// Format assumed for reference rows without a `format` field.
    #[builder(default)]
    default_format: AnswerFormat,
}

impl Default for MarkingConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl MarkingConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let feedback_style = lookup(FEEDBACK_STYLE_VAR)
            .and_then(|value| match value.parse::<FeedbackStyle>() {
                Ok(style) => Some(style),
                Err(e) => {
                    tracing::warn!("{e} Using the default.");
                    None
                }
            })
            .unwrap_or_default();

        let summary_limit = lookup(SUMMARY_LIMIT_VAR)
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(SUMMARY_MISMATCH_LIMIT);

        let default_format = lookup(DEFAULT_FORMAT_VAR)
            .and_then(|value| value.parse::<AnswerFormat>().ok())
            .unwrap_or_default();

        Self {
            feedback_style,
            summary_limit,
            default_format,
        }
    }

    /// Returns the feedback style.
    pub fn feedback_style(&self) -> FeedbackStyle {
        self.feedback_style
    }

    /// Returns the summary mismatch limit.
    pub fn summary_limit(&self) -> usize {
        self.summary_limit
    }

    /// Returns the format assumed for rows without one.
    pub fn default_format(&self) -> AnswerFormat {
        self.default_format
    }

    /// Overrides the feedback style.
    pub fn with_feedback_style(mut self, style: FeedbackStyle) -> Self {
        self.feedback_style = style;
        self
    }
}
