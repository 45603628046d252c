//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// Client-side correlation id for one interview attempt.
///
/// Never sent to the inference service; used to tie log lines together
/// across restarts of the same flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewId(Uuid);

impl InterviewId {
    /// Creates a new random InterviewId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InterviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InterviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque session handle issued by the inference service.
///
/// Immutable once issued; the client never inspects its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Creates a new SessionToken, returning error if empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ValidationError::empty_field("session_id"));
        }
        Ok(Self(token))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a candidate health condition (e.g. `diabetes`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionId(String);

impl ConditionId {
    /// Creates a new ConditionId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("current_condition"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human readable label: underscores become spaces, first letter capitalised.
    pub fn label(&self) -> String {
        let spaced = self.0.replace('_', " ");
        let mut chars = spaced.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordinal identity of a fixed-questionnaire question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(u32);

impl QuestionId {
    /// Creates a new QuestionId.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the inner ordinal.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Key under which the answer to this question is recorded.
    pub fn answer_key(&self) -> String {
        format!("question{}", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interview_id_generates_unique_values() {
        let id1 = InterviewId::new();
        let id2 = InterviewId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn interview_id_displays_as_hyphenated_uuid() {
        let shown = InterviewId::new().to_string();
        assert_eq!(shown.len(), 36);
        assert_eq!(shown.matches('-').count(), 4);
    }

    #[test]
    fn session_token_accepts_non_empty_string() {
        let token = SessionToken::new("s1").unwrap();
        assert_eq!(token.as_str(), "s1");
    }

    #[test]
    fn session_token_rejects_blank_string() {
        assert!(SessionToken::new("").is_err());
        assert!(SessionToken::new("   ").is_err());
    }

    #[test]
    fn session_token_serializes_transparently() {
        let token = SessionToken::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"abc\"");
    }

    #[test]
    fn condition_id_rejects_empty_string() {
        let result = ConditionId::new("");
        assert!(matches!(
            result,
            Err(ValidationError::EmptyField { field }) if field == "current_condition"
        ));
    }

    #[test]
    fn condition_id_label_humanises_snake_case() {
        let id = ConditionId::new("heart_disease").unwrap();
        assert_eq!(id.label(), "Heart disease");
    }

    #[test]
    fn question_id_answer_key_prefixes_ordinal() {
        assert_eq!(QuestionId::new(7).answer_key(), "question7");
    }
}
