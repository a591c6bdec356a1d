#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{collections::BTreeMap, sync::LazyLock};

use itertools::Itertools;
use regex::Regex;

use crate::types::QuestionNumber;

/// A line holding nothing but a section header such as `Teil 3`.
static SECTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*teil\s*[0-9]+\s*$").expect("section header regex is valid")
});

/// A line starting with a question number.
static NUMBERED_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:q\s*)?([0-9]+)\s*[.):=\-]?\s*(.+?)\s*$")
        .expect("numbered line regex is valid")
});

/// A question anchor inside a line.
static INLINE_ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:q\s*)?([0-9]+)\s*[.):=\-]*\s*").expect("inline anchor regex is valid")
});

/// Delimiters between tokens following an inline anchor.
static INLINE_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,|;/\s]+").expect("inline delimiter regex is valid"));

/// Characters stripped from whole-line tokens.
const LINE_WRAPPERS: &[char] = &['(', ')', '[', ']', '{', '}', '.', ':', '=', ',', ';'];

/// Characters stripped from inline tokens.
const INLINE_WRAPPERS: &[char] = &['(', ')', '[', ']', '{', '}', '.', ':', '='];

/// Accumulates answers while walking a sectioned submission.
#[derive(Default)]
struct SectionWalker {
    /// Answers keyed by their global number.
    answers: BTreeMap<QuestionNumber, String>,
    /// Added to every local number in the current section.
    offset:  QuestionNumber,
}

impl SectionWalker {
    /// Registers `token` for the local question `local` unless already taken.
    fn claim(&mut self, local: &str, token: &str) {
        if token.is_empty() {
            return;
        }
        let Some(global) = local
            .parse::<QuestionNumber>()
            .ok()
            .and_then(|n| n.checked_add(self.offset))
        else {
            return;
        };
        self.answers
            .entry(global)
            .or_insert_with(|| token.to_string());
    }

    /// Processes one line of the submission.
    fn visit(&mut self, line: &str) {
        let line = line.trim();

        if SECTION_HEADER.is_match(line) {
            self.offset = self.answers.keys().next_back().copied().unwrap_or(0);
            tracing::trace!("section header `{line}`, offset now {}", self.offset);
            return;
        }

        if let Some(caps) = NUMBERED_LINE.captures(line)
            && let (Some(number), Some(rest)) = (caps.get(1), caps.get(2))
        {
            self.claim(number.as_str(), rest.as_str().trim().trim_matches(LINE_WRAPPERS));
            return;
        }

        let anchors: Vec<_> = INLINE_ANCHOR.captures_iter(line).collect();
        for (i, caps) in anchors.iter().enumerate() {
            let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let end = anchors
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(line.len(), |next| next.start());
            let chunk = line[whole.end()..end].trim();
            let token = INLINE_DELIMITER
                .split(chunk)
                .next()
                .unwrap_or("")
                .trim_matches(INLINE_WRAPPERS);
            self.claim(number.as_str(), token);
        }
    }
}

/// Rewrites a submission split into `Teil` sections to global numbering.
///
/// Each `Teil <n>` header line shifts the numbering of the following lines by
/// the highest question number seen so far, so `Teil 2` restarting at `1`
/// continues after the last answer of `Teil 1`. The result holds one
/// `"<n>. <token>"` line per question in ascending order and is empty when no
/// answers were found.
///
/// ```
/// use objmark::objective::globalize;
///
/// let text = "Teil 1\n1 B\n2 A\nTeil 2\n1) ja\n2) Uhr";
/// assert_eq!(globalize(text), "1. B\n2. A\n3. ja\n4. Uhr");
/// ```
pub fn globalize(student_text: &str) -> String {
    let mut walker = SectionWalker::default();
    for line in student_text.lines() {
        walker.visit(line);
    }
    walker
        .answers
        .iter()
        .map(|(n, token)| format!("{n}. {token}"))
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_section_header_keeps_numbering() {
        assert_eq!(globalize("Teil 3\n1 A\n2 C"), "1. A\n2. C");
    }

    #[test]
    fn inline_anchors_when_line_has_a_prefix() {
        assert_eq!(globalize("Antworten: 1 A / 2 B, 3=C"), "1. A\n2. B\n3. C");
    }

    #[test]
    fn strips_trailing_separators_from_lines() {
        assert_eq!(globalize("1) (Uhr);"), "1. Uhr");
    }

    #[test]
    fn nothing_found_is_empty() {
        assert_eq!(globalize(""), "");
        assert_eq!(globalize("Teil 1\nkeine Antwort"), "");
    }
}
