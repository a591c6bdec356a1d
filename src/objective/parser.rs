#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use super::normalize::{CanonicalToken, normalize};
use crate::types::QuestionNumber;

/// Question anchor anywhere in the text: optional `Q`, digits, then any run of
/// separators and whitespace.
static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:q\s*)?([0-9]+)[\s.):=\-]*").expect("anchor regex is valid")
});

/// Whole-line answer: optional `Q`, digits, at most one separator, the rest.
static LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:q\s*)?([0-9]+)\s*[.):=\-]?\s*(.+?)\s*$").expect("line regex is valid")
});

/// Delimiters between tokens inside an anchor's span.
static CHUNK_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,|;]+").expect("chunk delimiter regex is valid"));

/// Characters stripped from both ends of an anchored token.
const TOKEN_WRAPPERS: &[char] = &['(', ')', '[', ']', '{', '}', '.', ':', '='];

/// Characters stripped from both ends of a whole-line answer.
const LINE_WRAPPERS: &[char] = &['(', ')', '[', ']', '{', '}', '.', ':', '=', ',', ';'];

#[derive(Tabled, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One student answer, kept both as written and in canonical form.
pub struct StudentAnswer {
    /// * `raw`: the token as the student wrote it, used for feedback
    #[tabled(rename = "Written")]
    raw:       String,
    /// * `canonical`: the token used for comparison
    #[tabled(rename = "Canonical")]
    canonical: CanonicalToken,
}

impl StudentAnswer {
    /// Wraps a raw token together with its canonical form.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let canonical = normalize(&raw);
        Self { raw, canonical }
    }

    /// Returns the token as written.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the canonical form.
    pub fn canonical(&self) -> &CanonicalToken {
        &self.canonical
    }
}

/// Answers parsed out of a free-form submission, keyed by question number.
///
/// Only the first token claimed for a question is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentAnswerMap(BTreeMap<QuestionNumber, StudentAnswer>);

impl StudentAnswerMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `raw` for `question` unless the question already has an
    /// answer. Returns whether the token was kept.
    pub fn insert_first(&mut self, question: QuestionNumber, raw: impl Into<String>) -> bool {
        match self.0.entry(question) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(StudentAnswer::new(raw));
                true
            }
        }
    }

    /// Returns the answer for `question`, if one was given.
    pub fn get(&self, question: QuestionNumber) -> Option<&StudentAnswer> {
        self.0.get(&question)
    }

    /// Returns the token as written for `question`.
    pub fn raw(&self, question: QuestionNumber) -> Option<&str> {
        self.get(question).map(StudentAnswer::raw)
    }

    /// Returns the canonical token for `question`, empty when unanswered.
    pub fn canonical(&self, question: QuestionNumber) -> CanonicalToken {
        self.get(question)
            .map(|a| a.canonical().clone())
            .unwrap_or_default()
    }

    /// Iterates answers in ascending question order.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionNumber, &StudentAnswer)> {
        self.0.iter().map(|(q, a)| (*q, a))
    }

    /// Number of answered questions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no answers were found.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(QuestionNumber, S)> for StudentAnswerMap {
    /// Collects pairs in order, keeping the first token per question.
    fn from_iter<I: IntoIterator<Item = (QuestionNumber, S)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (q, raw) in iter {
            map.insert_first(q, raw);
        }
        map
    }
}

/// Takes the first delimited chunk of an anchor's span and strips wrapping
/// brackets and punctuation.
fn first_token(span: &str) -> &str {
    let span = span.trim();
    CHUNK_DELIMITER
        .split(span)
        .next()
        .unwrap_or("")
        .trim_matches(|c: char| TOKEN_WRAPPERS.contains(&c) || c.is_whitespace())
}

/// Registers one token per anchor found anywhere in `text`.
fn scan_anchors(text: &str, answers: &mut StudentAnswerMap) {
    let anchors: Vec<_> = ANCHOR.captures_iter(text).collect();
    tracing::trace!("found {} question anchors", anchors.len());

    for (i, caps) in anchors.iter().enumerate() {
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = anchors
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |next| next.start());

        let token = first_token(&text[whole.end()..end]);
        if token.is_empty() {
            continue;
        }
        match number.as_str().parse::<QuestionNumber>() {
            Ok(q) => {
                answers.insert_first(q, token);
            }
            Err(_) => tracing::debug!("ignoring out of range question `{}`", number.as_str()),
        }
    }
}

/// Adds whole-line answers for questions the anchor scan did not claim.
fn scan_lines(text: &str, answers: &mut StudentAnswerMap) {
    for line in text.lines() {
        let Some(caps) = LINE.captures(line) else {
            continue;
        };
        let (Some(number), Some(rest)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let rest = rest
            .as_str()
            .trim_matches(|c: char| LINE_WRAPPERS.contains(&c) || c.is_whitespace());
        if rest.is_empty() {
            continue;
        }
        if let Ok(q) = number.as_str().parse::<QuestionNumber>()
            && answers.insert_first(q, rest)
        {
            tracing::trace!("line fallback claimed question {q}");
        }
    }
}

/// Parses a free-form submission such as `"1 A, 2) Uhr, Q3=ja"` into
/// per-question answers.
///
/// The whole text is first scanned for question anchors and the first token
/// after each anchor is taken. A line-by-line pass then fills in questions the
/// anchor scan missed. Earlier registrations always win, so repeating a
/// question number never overrides the first answer. Text without anchors
/// gives an empty map.
///
/// ```
/// use objmark::objective::parse;
///
/// let answers = parse("Q2=B, 1) A");
/// assert_eq!(answers.raw(1), Some("A"));
/// assert_eq!(answers.raw(2), Some("B"));
/// ```
pub fn parse(freeform: &str) -> StudentAnswerMap {
    let mut answers = StudentAnswerMap::new();
    scan_anchors(freeform, &mut answers);
    scan_lines(freeform, &mut answers);
    answers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_pairs(map: &StudentAnswerMap) -> Vec<(QuestionNumber, &str)> {
        map.iter().map(|(q, a)| (q, a.raw())).collect()
    }

    #[test]
    fn accepts_common_delimiters() {
        let parsed = parse("1 A\n2: B\n3)C\nQ4=B\n5- a\n6. Uhr\n7) true");
        assert_eq!(
            raw_pairs(&parsed),
            vec![(1, "A"), (2, "B"), (3, "C"), (4, "B"), (5, "a"), (6, "Uhr"), (7, "true")]
        );
    }

    #[test]
    fn compact_runs_without_line_breaks() {
        let parsed = parse("1a2b3c");
        assert_eq!(raw_pairs(&parsed), vec![(1, "a"), (2, "b"), (3, "c")]);
    }

    #[test]
    fn strips_wrapping_punctuation() {
        let parsed = parse("1 (B), 2 [Uhr]. 3 {ja}");
        assert_eq!(raw_pairs(&parsed), vec![(1, "B"), (2, "Uhr"), (3, "ja")]);
    }

    #[test]
    fn first_claim_wins() {
        let parsed = parse("1 A 1 B");
        assert_eq!(raw_pairs(&parsed), vec![(1, "A")]);
    }

    #[test]
    fn line_pass_fills_empty_anchor() {
        // The anchor span starts with a comma, so only the line pass sees it.
        let parsed = parse("1 ,A");
        assert_eq!(raw_pairs(&parsed), vec![(1, "A")]);
        assert_eq!(parsed.canonical(1).as_str(), "A");
    }

    #[test]
    fn keeps_canonical_alongside_raw() {
        let parsed = parse("1) schön");
        let answer = parsed.get(1).expect("question 1");
        assert_eq!(answer.raw(), "schön");
        assert_eq!(answer.canonical().as_str(), "schoen");
    }

    #[test]
    fn no_anchors_is_empty() {
        assert!(parse("").is_empty());
        assert!(parse("keine Ahnung").is_empty());
    }
}
