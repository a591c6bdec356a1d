use std::sync::LazyLock;

use regex::Regex;

/// A 1-based question number as it appears in labels and submissions.
pub type QuestionNumber = u32;

/// First run of ASCII digits inside a label.
static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("first-number regex is valid"));

/// Extracts the first number found in `label`, e.g. `answer12` gives `12`.
///
/// Labels without any digit (or with a number too large to represent) fall
/// back to question `0`, so several undigited labels collide on the same key.
pub fn question_number_from_label(label: &str) -> QuestionNumber {
    match FIRST_NUMBER
        .find(label)
        .and_then(|m| m.as_str().parse().ok())
    {
        Some(n) => n,
        None => {
            tracing::debug!("label `{label}` carries no usable number, using question 0");
            0
        }
    }
}
