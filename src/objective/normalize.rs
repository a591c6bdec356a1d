#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Tokens that fold to `true` when they make up the whole answer.
const TRUE_SYNONYMS: [&str; 6] = ["t", "true", "ja", "j", "y", "yes"];

/// Tokens that fold to `false` when they make up the whole answer.
const FALSE_SYNONYMS: [&str; 5] = ["f", "false", "nein", "n", "no"];

/// A normalized answer token, used for comparison only and never for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalToken(String);

impl CanonicalToken {
    /// Returns the canonical text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether nothing survived normalization; empty tokens never match.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for CanonicalToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Returns the upper-cased letter if `s` is exactly one of `a`-`d`/`A`-`D`.
fn choice_letter(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ ('a'..='d' | 'A'..='D')), None) => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}

/// Spells out German umlauts and `ß` in ASCII.
fn fold_diacritics(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        match c {
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'ß' => out.push_str("ss"),
            other => out.push(other),
        }
    }
    out
}

/// Canonicalizes a single answer token.
///
/// A lone choice letter (`A`-`D`, any case) is returned upper-cased before any
/// word folding. Everything else is lower-cased, has umlauts spelled out,
/// collapses yes/no synonyms to `true`/`false` when the whole token is one,
/// and finally keeps only letters, digits and underscores.
///
/// ```
/// use objmark::objective::normalize;
///
/// assert_eq!(normalize(" b ").as_str(), "B");
/// assert_eq!(normalize("Schön!"), normalize("schoen"));
/// assert_eq!(normalize("Ja").as_str(), "true");
/// assert_eq!(normalize("nein").as_str(), "false");
/// ```
pub fn normalize(raw: &str) -> CanonicalToken {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return CanonicalToken::default();
    }

    if let Some(letter) = choice_letter(trimmed) {
        return CanonicalToken(letter.to_string());
    }

    let folded = fold_diacritics(&trimmed.to_lowercase());

    if TRUE_SYNONYMS.contains(&folded.as_str()) {
        return CanonicalToken("true".into());
    }
    if FALSE_SYNONYMS.contains(&folded.as_str()) {
        return CanonicalToken("false".into());
    }

    CanonicalToken(
        folded
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect(),
    )
}
