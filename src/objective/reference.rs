#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    collections::BTreeMap,
    fmt::{self, Display},
    str::FromStr,
    sync::LazyLock,
};

use itertools::Itertools;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    constants::{NO_REFERENCE_ANSWERS, OBJECTIVE_FORMAT},
    types::{QuestionNumber, question_number_from_label},
    util::natural_cmp,
};

/// A reference line such as `3. Uhr` or `3) Uhr`.
static REFERENCE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]+)\s*[.)\-]?\s*(.+)$").expect("reference line regex is valid")
});

/// An error raised when a reference document does not have the expected
/// shape.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// A value that must be a JSON object was something else.
    #[error("Expected {0} to be a JSON object.")]
    NotAnObject(String),
    /// An answer was an array or an object instead of a scalar.
    #[error("Answer `{0}` must be a string, number, boolean or null.")]
    NestedValue(String),
}

/// Where the expected answers come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceSource {
    /// Lines shaped like `"<n>. <answer>"`; lines without a leading number
    /// (headers, blanks) are ignored.
    TextBlock(String),
    /// Label/answer pairs such as `("answer3", "Uhr")` or `("3", "Uhr")`.
    StructuredMap(Vec<(String, String)>),
    /// Answers grouped into `Teil` sections and numbered globally from `1`.
    Sectioned(Vec<ReferenceSection>),
}

/// One `Teil` of a sectioned reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSection {
    /// * `label`: section key as it appears in the document, e.g. `teil3`
    pub label:   String,
    /// * `entries`: label/answer pairs inside the section
    pub entries: Vec<(String, String)>,
}

impl ReferenceSource {
    /// Reads the `answers` object of a reference document.
    ///
    /// Objects with keys starting with `teil` become [`ReferenceSource::Sectioned`],
    /// every other object becomes [`ReferenceSource::StructuredMap`].
    pub fn from_json(answers: &Value) -> Result<Self, SourceError> {
        let object = answers
            .as_object()
            .ok_or_else(|| SourceError::NotAnObject("answers".into()))?;

        let part_keys: Vec<&String> = object
            .keys()
            .filter(|k| k.to_lowercase().starts_with("teil"))
            .sorted_by(|a, b| natural_cmp(a, b))
            .collect();

        if part_keys.is_empty() {
            return Ok(Self::StructuredMap(scalar_pairs(object)?));
        }

        let mut sections = Vec::with_capacity(part_keys.len());
        for key in part_keys {
            let entries = match &object[key] {
                Value::Null => Vec::new(),
                Value::Object(part) => scalar_pairs(part)?,
                _ => return Err(SourceError::NotAnObject(format!("section `{key}`"))),
            };
            sections.push(ReferenceSection {
                label: key.clone(),
                entries,
            });
        }
        Ok(Self::Sectioned(sections))
    }
}

/// Converts every entry of `object` to a label/text pair.
fn scalar_pairs(object: &Map<String, Value>) -> Result<Vec<(String, String)>, SourceError> {
    object
        .iter()
        .map(|(k, v)| Ok((k.clone(), scalar_text(k, v)?)))
        .collect()
}

/// Renders a scalar answer as text; null becomes empty and is later skipped.
fn scalar_text(label: &str, value: &Value) -> Result<String, SourceError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => Err(SourceError::NestedValue(label.to_string())),
    }
}

/// Trims `value` and returns it unless it is blank or a `nan`/`none`
/// placeholder.
fn usable(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") || value.eq_ignore_ascii_case("none")
    {
        None
    } else {
        Some(value)
    }
}

/// Expected answers keyed by question number, always iterated in ascending
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceAnswerMap(BTreeMap<QuestionNumber, String>);

impl ReferenceAnswerMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expected answer for `question`, replacing an earlier one.
    pub fn insert(&mut self, question: QuestionNumber, expected: impl Into<String>) {
        self.0.insert(question, expected.into());
    }

    /// Returns the expected answer for `question`.
    pub fn get(&self, question: QuestionNumber) -> Option<&str> {
        self.0.get(&question).map(String::as_str)
    }

    /// Iterates entries in ascending question order.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionNumber, &str)> {
        self.0.iter().map(|(q, a)| (*q, a.as_str()))
    }

    /// Number of expected answers.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no usable answers were found. Callers show
    /// [`NO_REFERENCE_ANSWERS`] in that case.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the key as `"<n>. <answer>"` lines, or the no-reference
    /// sentinel when empty.
    pub fn to_text(&self) -> String {
        if self.is_empty() {
            NO_REFERENCE_ANSWERS.to_string()
        } else {
            self.iter().map(|(q, a)| format!("{q}. {a}")).join("\n")
        }
    }
}

impl<S: Into<String>> FromIterator<(QuestionNumber, S)> for ReferenceAnswerMap {
    fn from_iter<I: IntoIterator<Item = (QuestionNumber, S)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(q, a)| (q, a.into())).collect())
    }
}

/// Parses `"<n>. <answer>"` lines.
fn from_text_block(text: &str) -> ReferenceAnswerMap {
    let mut map = ReferenceAnswerMap::new();
    for line in text.lines() {
        let Some(caps) = REFERENCE_LINE.captures(line) else {
            continue;
        };
        let (Some(number), Some(answer)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        match (number.as_str().parse(), usable(answer.as_str())) {
            (Ok(q), Some(answer)) => map.insert(q, answer),
            _ => tracing::debug!("skipping reference line `{line}`"),
        }
    }
    map
}

/// Numbers each pair by the first number in its label.
fn from_structured_map(pairs: &[(String, String)]) -> ReferenceAnswerMap {
    let mut map = ReferenceAnswerMap::new();
    for (label, value) in pairs {
        match usable(value) {
            Some(answer) => map.insert(question_number_from_label(label), answer),
            None => tracing::debug!("skipping empty reference answer `{label}`"),
        }
    }
    map
}

/// Numbers usable answers of all sections consecutively from `1`.
fn from_sections(sections: &[ReferenceSection]) -> ReferenceAnswerMap {
    let mut map = ReferenceAnswerMap::new();
    let mut next: QuestionNumber = 1;
    for section in sections {
        let ordered = section
            .entries
            .iter()
            .sorted_by_key(|(label, _)| question_number_from_label(label));
        for (_, value) in ordered {
            if let Some(answer) = usable(value) {
                map.insert(next, answer);
                next += 1;
            }
        }
    }
    map
}

/// Builds the reference answer key from any supported source.
///
/// Values that are blank or read `nan`/`none` are skipped. An empty result is
/// not an error: it is the "no reference answers" condition, see
/// [`ReferenceAnswerMap::is_empty`].
pub fn build(source: &ReferenceSource) -> ReferenceAnswerMap {
    let map = match source {
        ReferenceSource::TextBlock(text) => from_text_block(text),
        ReferenceSource::StructuredMap(pairs) => from_structured_map(pairs),
        ReferenceSource::Sectioned(sections) => from_sections(sections),
    };
    if map.is_empty() {
        tracing::debug!("{NO_REFERENCE_ANSWERS}");
    }
    map
}

/// How an assignment is meant to be marked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerFormat {
    /// Marked deterministically against the answer key.
    Objective,
    /// Anything else; handed to the external marker.
    #[default]
    Essay,
}

impl FromStr for AnswerFormat {
    type Err = std::convert::Infallible;

    /// Any value other than `objective` (ignoring case and surrounding
    /// whitespace) reads as [`AnswerFormat::Essay`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(OBJECTIVE_FORMAT) {
            Ok(Self::Objective)
        } else {
            Ok(Self::Essay)
        }
    }
}

impl Display for AnswerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Objective => write!(f, "objective"),
            Self::Essay => write!(f, "essay"),
        }
    }
}

/// A reference answer key together with the metadata stored next to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceKey {
    /// Expected answers.
    pub answers: ReferenceAnswerMap,
    /// Link to the published solution, possibly empty.
    pub link:    String,
    /// How the assignment is marked.
    pub format:  AnswerFormat,
}

impl ReferenceKey {
    /// Reads one assignment row of a reference document.
    ///
    /// The answers come from the row's `answers` object when it is present
    /// and non-empty, otherwise from its own `answer<n>` keys (keys without a
    /// digit, like `answer_url`, are not answers). `format` falls back to
    /// `default_format` when the row does not declare one.
    pub fn from_json_row(row: &Value, default_format: AnswerFormat) -> Result<Self, SourceError> {
        let row = row
            .as_object()
            .ok_or_else(|| SourceError::NotAnObject("reference row".into()))?;

        let answers = match row.get("answers") {
            Some(Value::Null) | None => None,
            Some(Value::Object(o)) if o.is_empty() => None,
            Some(other) => Some(other.clone()),
        }
        .unwrap_or_else(|| {
            Value::Object(
                row.iter()
                    .filter(|(k, _)| {
                        k.to_lowercase().starts_with("answer")
                            && k.bytes().any(|b| b.is_ascii_digit())
                    })
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            )
        });

        let format = match row.get("format").and_then(Value::as_str).map(str::trim) {
            Some(f) if !f.is_empty() => f.parse().unwrap_or(default_format),
            _ => default_format,
        };
        let link = row
            .get("answer_url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();

        Ok(Self {
            answers: build(&ReferenceSource::from_json(&answers)?),
            link,
            format,
        })
    }

    /// Whether the key should be marked deterministically.
    pub fn is_objective(&self) -> bool {
        self.format == AnswerFormat::Objective
    }
}

/// A whole answers dictionary: assignment name to reference row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswersDictionary(Map<String, Value>);

impl AnswersDictionary {
    /// Wraps a parsed answers dictionary document.
    pub fn from_json(document: Value) -> Result<Self, SourceError> {
        match document {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(SourceError::NotAnObject("answers dictionary".into())),
        }
    }

    /// Assignment names in natural order (`Teil 2` before `Teil 10`).
    pub fn assignments(&self) -> Vec<&str> {
        self.0
            .keys()
            .map(String::as_str)
            .sorted_by(|a, b| natural_cmp(a, b))
            .collect()
    }

    /// Reads the reference key of `assignment`, if the dictionary has it.
    pub fn key(
        &self,
        assignment: &str,
        default_format: AnswerFormat,
    ) -> Result<Option<ReferenceKey>, SourceError> {
        self.0
            .get(assignment)
            .map(|row| ReferenceKey::from_json_row(row, default_format))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn text_block_skips_headers_and_placeholders() {
        let map = build(&ReferenceSource::TextBlock(
            "Teil 3\n2. Uhr\n1) B\n3 - nan\n\n4.   Ja  ".into(),
        ));
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![(1, "B"), (2, "Uhr"), (4, "Ja")]);
    }

    #[test]
    fn structured_labels_use_first_number() {
        let map = build(&ReferenceSource::StructuredMap(vec![
            ("answer10".into(), "C".into()),
            ("answer2".into(), " A ".into()),
            ("3".into(), "None".into()),
        ]));
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![(2, "A"), (10, "C")]);
    }

    #[test]
    fn undigited_label_lands_on_zero() {
        let map = build(&ReferenceSource::StructuredMap(vec![("answer".into(), "B".into())]));
        assert_eq!(map.get(0), Some("B"));
    }

    #[test]
    fn sections_number_globally() {
        let source = ReferenceSource::from_json(&json!({
            "teil10": {"answer1": "Z"},
            "teil2": {"answer2": "B", "answer1": "A", "answer3": ""},
        }))
        .expect("sectioned answers");
        let map = build(&source);
        assert_eq!(map.iter().collect::<Vec<_>>(), vec![(1, "A"), (2, "B"), (3, "Z")]);
    }

    #[test]
    fn rejects_nested_answers() {
        let err = ReferenceSource::from_json(&json!({"answer1": ["A"]})).unwrap_err();
        assert_eq!(err, SourceError::NestedValue("answer1".into()));
    }

    #[test]
    fn empty_map_renders_sentinel() {
        assert_eq!(ReferenceAnswerMap::new().to_text(), NO_REFERENCE_ANSWERS);
    }
}
