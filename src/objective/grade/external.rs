#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::LazyLock;

use anyhow::Result;
use bon::Builder;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::{objective_mark, results::MarkOutcome};
use crate::{config::MarkingConfig, objective::reference::ReferenceKey};

/// The outermost `{ ... }` block of a reply, across newlines.
static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("json object regex is valid"));

/// Everything an external marker is given for one submission.
#[derive(Serialize, Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct MarkRequest {
    /// The student's free-form submission.
    pub student_text:   String,
    /// The reference key rendered as `"<n>. <answer>"` lines.
    pub reference_text: String,
    /// The student's course level, e.g. `A1`.
    #[builder(default)]
    pub level:          String,
}

/// A non-deterministic marking service, typically a hosted language model.
///
/// Implementations return the service's raw reply, which is expected to hold
/// a JSON object `{"score": <0-100>, "feedback": "<text>"}`.
pub trait ExternalMarker {
    /// Sends `request` to the service and returns its raw reply.
    fn mark(&self, request: &MarkRequest) -> Result<String>;
}

/// Reads a score out of a JSON value the way a lenient integer cast would.
fn score_from(value: Option<&Value>) -> Option<i64> {
    match value {
        None => Some(0),
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(Value::Bool(b)) => Some(i64::from(*b)),
        Some(_) => None,
    }
}

/// Extracts a [`MarkOutcome`] from an external marker's reply.
///
/// The first `{` up to the last `}` is parsed as JSON. The score is clamped
/// to `0..=100` and defaults to `0` when absent; feedback is trimmed. Replies
/// that hold no usable object give `None` so callers can keep whatever score
/// they had.
pub fn parse_marker_reply(raw: &str) -> Option<MarkOutcome> {
    let text = raw.trim();
    let candidate = JSON_OBJECT.find(text).map_or(text, |m| m.as_str());

    let data: Value = match serde_json::from_str(candidate) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("external marker reply is not JSON: {e}");
            return None;
        }
    };
    let data = data.as_object()?;

    let score = score_from(data.get("score"))?.clamp(0, 100);
    let feedback = match data.get("feedback") {
        None => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    };

    Some(MarkOutcome {
        score: u8::try_from(score).unwrap_or(100),
        feedback,
    })
}

/// Marks one submission along the path its reference key asks for.
///
/// Objective keys are marked deterministically. Other keys go to `marker`;
/// without a marker, or when it fails or replies with garbage, the result is
/// `None`.
pub fn mark_submission(
    key: &ReferenceKey,
    student_text: &str,
    level: &str,
    config: &MarkingConfig,
    marker: Option<&dyn ExternalMarker>,
) -> Option<MarkOutcome> {
    if key.is_objective() {
        return Some(objective_mark(student_text, &key.answers, config));
    }

    let marker = marker?;
    let request = MarkRequest::builder()
        .student_text(student_text)
        .reference_text(key.answers.to_text())
        .level(level)
        .build();

    match marker.mark(&request) {
        Ok(reply) => parse_marker_reply(&reply),
        Err(e) => {
            tracing::warn!("external marker failed: {e:#}");
            None
        }
    }
}
