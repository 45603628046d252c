//! Answer set collected by the fixed questionnaire.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::QuestionId;

/// Mapping from `"question{id}"` to the selected option text.
///
/// Keys are unique; re-answering a question replaces the earlier answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, String>);

impl AnswerSet {
    /// Creates an empty answer set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the answer to a question.
    pub fn record(&mut self, question: QuestionId, answer: impl Into<String>) {
        self.0.insert(question.answer_key(), answer.into());
    }

    /// Returns the answer recorded for a question.
    pub fn get(&self, question: QuestionId) -> Option<&str> {
        self.0.get(&question.answer_key()).map(String::as_str)
    }

    /// Number of answered questions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing has been answered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(key, answer)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
