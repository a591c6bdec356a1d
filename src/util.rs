#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{cmp::Ordering, sync::LazyLock};

use regex::Regex;

/// Alternating runs of digits and non-digits.
static NATURAL_CHUNKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+|[^0-9]+").expect("natural chunk regex is valid"));

/// A word with an optional apostrophe suffix, e.g. `don't` counts once.
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+(?:'[A-Za-z]+)?\b").expect("word regex is valid"));

/// One piece of a natural sort key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum NaturalChunk {
    /// A run of digits, compared numerically.
    Number(u128),
    /// Any other run, compared case-insensitively.
    Text(String),
}

/// Builds a sort key in which `Teil 10` sorts after `Teil 9`.
pub fn natural_key(s: &str) -> Vec<NaturalChunk> {
    NATURAL_CHUNKS
        .find_iter(s)
        .map(|m| {
            let run = m.as_str();
            match run.parse::<u128>() {
                Ok(n) if run.bytes().all(|b| b.is_ascii_digit()) => NaturalChunk::Number(n),
                _ => NaturalChunk::Text(run.to_lowercase()),
            }
        })
        .collect()
}

/// Compares two labels by their natural sort keys.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

/// Counts words the way feedback length limits are measured.
pub fn count_words(s: &str) -> usize {
    WORD.find_iter(s).count()
}
