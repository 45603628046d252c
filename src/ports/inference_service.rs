//! Inference service port - the external risk scoring and question service.
//!
//! The service is an opaque collaborator. This port fixes the contract the
//! interview consumes: four round trips, each returning a typed outcome or
//! an `InferenceError`.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct FixedService;
//!
//! #[async_trait]
//! impl InferenceService for FixedService {
//!     async fn continue_interview(&self, request: TurnRequest) -> Result<TurnResponse, InferenceError> {
//!         Err(InferenceError::service("session expired"))
//!     }
//!     // ... other methods
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::assessment::RiskLevel;
use crate::domain::foundation::{ConditionId, ErrorCode, SessionToken};
use crate::domain::intake::UserContext;
use crate::domain::interview::{StartResponse, StopResponse, TurnRequest, TurnResponse};
use crate::domain::questionnaire::AnswerSet;

/// Port for the inference service.
///
/// Every method performs exactly one round trip. Implementations resolve
/// the wire format into domain types; callers never see raw payloads except
/// the opaque diagnosis document forwarded to `start_interview`.
#[async_trait]
pub trait InferenceService: Send + Sync {
    /// Scores the context and questionnaire answers (`POST /diagnose`).
    async fn diagnose(&self, request: DiagnoseRequest) -> Result<DiagnosisOutcome, InferenceError>;

    /// Opens an interview session (`POST /start-detective`).
    async fn start_interview(&self, request: StartRequest) -> Result<StartResponse, InferenceError>;

    /// Submits one answer (`POST /continue-detective`).
    async fn continue_interview(&self, request: TurnRequest) -> Result<TurnResponse, InferenceError>;

    /// Ends the session early (`POST /stop-detective`).
    async fn stop_interview(&self, session_id: &SessionToken) -> Result<StopResponse, InferenceError>;
}

/// Body of the diagnose call: context fields and questionnaire answers in one flat object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnoseRequest {
    #[serde(flatten)]
    pub context: UserContext,
    #[serde(flatten)]
    pub answers: AnswerSet,
}

impl DiagnoseRequest {
    pub fn new(context: UserContext, answers: AnswerSet) -> Self {
        Self { context, answers }
    }
}

/// Body of the start call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartRequest {
    pub diagnosis_data: Value,
    pub user_assessment: Value,
}

impl StartRequest {
    /// Seeds the interview from a successful diagnosis.
    pub fn from_diagnosis(outcome: &DiagnosisOutcome) -> Self {
        Self {
            diagnosis_data: outcome.payload.clone(),
            user_assessment: outcome.user_assessment.clone(),
        }
    }
}

/// Per-condition screening result from the diagnose call, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub condition: ConditionId,
    pub display_name: String,
    pub probability: Option<f64>,
    pub risk_level: Option<RiskLevel>,
    pub error: Option<String>,
}

/// Successful diagnose response.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosisOutcome {
    /// The whole response document, forwarded opaquely as `diagnosis_data`.
    pub payload: Value,
    /// The service's summary of the submitted answers, forwarded as `user_assessment`.
    pub user_assessment: Value,
    /// Parsed screening results in response order.
    pub screening: Vec<ScreeningResult>,
}

/// Errors from the inference service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    /// The service answered with an `error` field.
    #[error("service error: {message}")]
    Service {
        /// Error text reported by the service.
        message: String,
    },

    /// The service answered with a non-success status and no error body.
    #[error("service unavailable (status {status}): {message}")]
    Unavailable {
        /// HTTP status code.
        status: u16,
        /// Error details.
        message: String,
    },

    /// Connection-level failure.
    #[error("network error: {0}")]
    Network(String),

    /// The round trip exceeded its deadline.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u64,
    },

    /// The response body was not valid JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// The response was JSON but lacked a field its shape requires.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl InferenceError {
    /// Creates a service error.
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(status: u16, message: impl Into<String>) -> Self {
        Self::Unavailable {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_secs: u64) -> Self {
        Self::Timeout { timeout_secs }
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a malformed payload error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPayload(message.into())
    }

    /// Returns true if repeating the same request may succeed.
    ///
    /// Errors the service reported itself are never retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            InferenceError::Unavailable { .. } | InferenceError::Network(_) | InferenceError::Timeout { .. }
        )
    }

    /// Domain error code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            InferenceError::Service { .. } => ErrorCode::ServiceError,
            InferenceError::Unavailable { .. } | InferenceError::Network(_) => {
                ErrorCode::ServiceUnavailable
            }
            InferenceError::Timeout { .. } => ErrorCode::Timeout,
            InferenceError::Parse(_) => ErrorCode::InternalError,
            InferenceError::MalformedPayload(_) => ErrorCode::QuestionNotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::QuestionId;
    use crate::domain::intake::ContextField;

    #[test]
    fn transport_failures_are_retryable() {
        assert!(InferenceError::timeout(30).is_retryable());
        assert!(InferenceError::network("connection refused").is_retryable());
        assert!(InferenceError::unavailable(503, "busy").is_retryable());
    }

    #[test]
    fn service_and_payload_errors_are_not_retryable() {
        assert!(!InferenceError::service("session expired").is_retryable());
        assert!(!InferenceError::parse("expected value").is_retryable());
        assert!(!InferenceError::malformed("question").is_retryable());
    }

    #[test]
    fn malformed_payload_maps_to_question_not_found() {
        assert_eq!(InferenceError::malformed("question").code(), ErrorCode::QuestionNotFound);
        assert_eq!(InferenceError::service("x").code(), ErrorCode::ServiceError);
    }

    #[test]
    fn error_displays_message() {
        let err = InferenceError::service("session expired");
        assert_eq!(err.to_string(), "service error: session expired");
    }

    #[test]
    fn diagnose_request_serializes_flat() {
        let context = UserContext::default()
            .with(ContextField::Age, "42")
            .with(ContextField::FamilyHistory, "diabetes");
        let mut answers = AnswerSet::new();
        answers.record(QuestionId::new(1), "Low");

        let json = serde_json::to_value(DiagnoseRequest::new(context, answers)).unwrap();

        assert_eq!(json["age"], "42");
        assert_eq!(json["familyHistory"], "diabetes");
        assert_eq!(json["question1"], "Low");
    }
}
