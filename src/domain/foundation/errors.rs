//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Rejected input while building a value object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("unknown context field '{0}'")]
    UnknownField(String),
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn unknown_field(name: impl Into<String>) -> Self {
        ValidationError::UnknownField(name.into())
    }
}

/// Stable codes attached to every surfaced failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Input
    ValidationFailed,
    QuestionNotFound,

    // Interview lifecycle
    InvalidStateTransition,
    InterviewTerminal,
    TurnInFlight,

    // Inference service
    ServiceError,
    ServiceUnavailable,
    Timeout,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::QuestionNotFound => "QUESTION_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::InterviewTerminal => "INTERVIEW_TERMINAL",
            ErrorCode::TurnInFlight => "TURN_IN_FLIGHT",
            ErrorCode::ServiceError => "SERVICE_ERROR",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// An illegal lifecycle move, raised by `StateMachine::transition_to`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {message}")]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_names_the_field() {
        let err = ValidationError::empty_field("session_id");
        assert_eq!(err.to_string(), "Field 'session_id' cannot be empty");
    }

    #[test]
    fn unknown_field_quotes_the_input() {
        let err = ValidationError::unknown_field("blood_type");
        assert_eq!(err.to_string(), "unknown context field 'blood_type'");
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::InvalidStateTransition, "Cannot transition from Report to Interview");
        assert_eq!(
            err.to_string(),
            "[INVALID_STATE_TRANSITION] Cannot transition from Report to Interview"
        );
    }

    #[test]
    fn error_code_display_is_screaming_snake_case() {
        assert_eq!(ErrorCode::TurnInFlight.to_string(), "TURN_IN_FLIGHT");
        assert_eq!(ErrorCode::ServiceUnavailable.to_string(), "SERVICE_UNAVAILABLE");
    }
}
