//! Questionnaire answers.
//!
//! Raw answers arrive as arbitrary JSON. They are validated once, here, into
//! an [`AnswerValue`] so the report builder only ever sees three shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Errors raised while validating a raw answer.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    /// Stored answer text is not valid JSON.
    #[error("answer for '{question_id}' is not valid JSON: {source}")]
    Malformed {
        /// Question whose answer failed to parse.
        question_id: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },
    /// The answer was JSON `null`.
    #[error("answer for '{question_id}' is null")]
    Null {
        /// Question with the null answer.
        question_id: String,
    },
}

/// A validated questionnaire answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    /// A yes/no toggle stored as a JSON boolean.
    Flag(bool),
    /// A single text or numeric value.
    Scalar(String),
    /// An ordered multi-select answer.
    List(Vec<String>),
    /// Any other nested shape. Kept verbatim; report fields ignore it.
    Structured(Value),
}

impl AnswerValue {
    /// Validate a raw JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`AnswerError::Null`] for JSON `null`.
    pub fn from_json(question_id: &str, value: Value) -> Result<Self, AnswerError> {
        match value {
            Value::Null => Err(AnswerError::Null {
                question_id: question_id.to_owned(),
            }),
            Value::Bool(b) => Ok(Self::Flag(b)),
            Value::String(s) => Ok(Self::Scalar(s)),
            Value::Number(n) => Ok(Self::Scalar(n.to_string())),
            Value::Array(items) => {
                let scalars: Option<Vec<String>> = items.iter().map(scalar_text).collect();
                Ok(match scalars {
                    Some(list) => Self::List(list),
                    None => Self::Structured(Value::Array(items)),
                })
            }
            object @ Value::Object(_) => Ok(Self::Structured(object)),
        }
    }

    /// Parse the stored (JSON-encoded) wire form of an answer.
    ///
    /// # Errors
    ///
    /// Returns [`AnswerError::Malformed`] if `raw` is not JSON, or
    /// [`AnswerError::Null`] if it encodes `null`.
    pub fn parse_stored(question_id: &str, raw: &str) -> Result<Self, AnswerError> {
        let value = serde_json::from_str(raw).map_err(|source| AnswerError::Malformed {
            question_id: question_id.to_owned(),
            source,
        })?;
        Self::from_json(question_id, value)
    }

    /// Convert back to raw JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Flag(b) => Value::Bool(*b),
            Self::Scalar(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
            Self::Structured(v) => v.clone(),
        }
    }

    /// The stored wire form: the JSON encoding of the raw value.
    pub fn to_stored(&self) -> String {
        self.to_json().to_string()
    }

    /// Scalar text, if this is a scalar.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// List items, if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whether the answer reads as an affirmative "Yes".
    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Flag(true)) || self.as_scalar() == Some("Yes")
    }

    /// Whether the answer carries any content at all.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Flag(b) => *b,
            Self::Scalar(s) => !s.is_empty(),
            Self::List(_) | Self::Structured(_) => true,
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// One persisted answer row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRow {
    /// Owning session.
    pub session_id: String,
    /// Questionnaire section the question belongs to.
    pub section_id: String,
    /// Question identifier (e.g. `has_debt`).
    pub question_id: String,
    /// JSON-encoded raw answer.
    pub answer: String,
}

/// Every answer of one session, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    values: BTreeMap<String, AnswerValue>,
}

impl Answers {
    /// Empty answer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect validated answers from stored rows.
    ///
    /// Rows that fail validation are skipped with a warning; a later row for
    /// the same question replaces an earlier one.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a AnswerRow>) -> Self {
        let mut answers = Self::new();
        for row in rows {
            match AnswerValue::parse_stored(&row.question_id, &row.answer) {
                Ok(value) => answers.insert(row.question_id.clone(), value),
                Err(err) => tracing::warn!(error = %err, "skipping unreadable answer"),
            }
        }
        answers
    }

    /// Insert or replace an answer.
    pub fn insert(&mut self, question_id: impl Into<String>, value: AnswerValue) {
        self.values.insert(question_id.into(), value);
    }

    /// Look up an answer by question id.
    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.values.get(question_id)
    }

    /// Scalar answer text for a question.
    pub fn scalar(&self, question_id: &str) -> Option<&str> {
        self.get(question_id).and_then(AnswerValue::as_scalar)
    }

    /// List answer for a question.
    pub fn list(&self, question_id: &str) -> Option<&[String]> {
        self.get(question_id).and_then(AnswerValue::as_list)
    }

    /// Whether the question was answered "Yes".
    pub fn is_yes(&self, question_id: &str) -> bool {
        self.get(question_id).is_some_and(AnswerValue::is_yes)
    }

    /// Whether the question is unanswered, blank, or answered "No".
    pub fn is_missing_or_no(&self, question_id: &str) -> bool {
        match self.get(question_id) {
            None => true,
            Some(value) => !value.is_present() || value.as_scalar() == Some("No"),
        }
    }

    /// Number of answered questions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no question has been answered.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate answers in question-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
