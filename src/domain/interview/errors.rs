//! Interview-specific error types.

use super::InterviewState;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::InferenceError;

/// Errors raised by interview session operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterviewError {
    /// Operation not allowed in the current state.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: InterviewState,
    },

    /// An answer is already in flight.
    #[error("an answer is already being submitted")]
    TurnInFlight,

    /// The interview has ended.
    #[error("interview has ended")]
    Terminal,

    /// A stop has been requested; no more answers are accepted.
    #[error("interview is stopping")]
    StopPending,

    /// The option is not offered by the current question.
    #[error("'{0}' is not an option for the current question")]
    InvalidOption(String),

    /// The last failure cannot be retried; the interview must be restarted.
    #[error("interview cannot be retried; restart required")]
    NotRetryable,

    /// The state machine rejected a transition.
    #[error(transparent)]
    Transition(#[from] DomainError),

    /// The inference round trip failed.
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl InterviewError {
    pub fn invalid_state(operation: &'static str, state: InterviewState) -> Self {
        InterviewError::InvalidState { operation, state }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            InterviewError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            InterviewError::TurnInFlight => ErrorCode::TurnInFlight,
            InterviewError::Terminal | InterviewError::StopPending => ErrorCode::InterviewTerminal,
            InterviewError::InvalidOption(_) => ErrorCode::ValidationFailed,
            InterviewError::NotRetryable => ErrorCode::InvalidStateTransition,
            InterviewError::Transition(e) => e.code,
            InterviewError::Inference(e) => e.code(),
        }
    }
}

/// A failure recorded on a faulted session, surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewFault {
    pub code: ErrorCode,
    pub message: String,
    pub retryable: bool,
}

impl From<&InferenceError> for InterviewFault {
    fn from(err: &InferenceError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_message_names_operation_and_state() {
        let err = InterviewError::invalid_state("submit an answer", InterviewState::ShowingTransition);
        assert_eq!(err.to_string(), "cannot submit an answer while Showing transition");
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn inference_error_keeps_its_code() {
        let err: InterviewError = InferenceError::timeout(30).into();
        assert_eq!(err.code(), ErrorCode::Timeout);
    }

    #[test]
    fn fault_records_retryability() {
        let fault = InterviewFault::from(&InferenceError::service("session expired"));
        assert!(!fault.retryable);
        assert_eq!(fault.code, ErrorCode::ServiceError);
        assert!(fault.message.contains("session expired"));
    }
}
