//! Typed interview round-trip contract.
//!
//! Each service response is resolved into exactly one of these shapes at the
//! adapter boundary, so the session never inspects optional wire fields.

use serde::{Deserialize, Serialize};

use crate::domain::assessment::{AssessmentMap, AssessmentStatus, ConditionAssessment, Confidence};
use crate::domain::foundation::{ConditionId, SessionToken};

/// An adaptive interview question as displayed to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub text: String,
    pub options: Vec<String>,
    pub message: Option<String>,
}

impl InterviewQuestion {
    pub fn new<S: Into<String>>(text: impl Into<String>, options: impl IntoIterator<Item = S>) -> Self {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns true if `option` is one of the offered choices.
    pub fn offers(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// A question together with the condition under investigation and the service's counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPayload {
    pub question: InterviewQuestion,
    pub condition: ConditionId,
    pub questions_asked: u32,
}

/// Successful `start-detective` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartResponse {
    pub session_id: SessionToken,
    pub first: QuestionPayload,
    pub can_stop: bool,
}

/// Body of a `continue-detective` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnRequest {
    pub session_id: SessionToken,
    pub answer: String,
}

/// Completed assessment delivered when the service moves to the next condition.
///
/// The wire form carries no condition id; the session attributes it to the
/// condition under investigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentVerdict {
    pub confidence: Confidence,
    pub comment: String,
    pub indicators: Vec<String>,
}

impl AssessmentVerdict {
    /// Attributes the verdict to `condition` as a fully assessed record.
    pub fn into_assessment(self, condition: ConditionId) -> ConditionAssessment {
        ConditionAssessment {
            condition,
            confidence: self.confidence,
            comment: self.comment,
            indicators: self.indicators,
            status: AssessmentStatus::Assessed,
        }
    }
}

/// Terminal payload from a turn that exhausted the investigation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FinalReportPayload {
    /// `all_conditions`, or `detailed_assessments` when that is absent.
    pub assessments: Option<AssessmentMap>,
    pub total_questions: Option<u32>,
    pub conditions_assessed: Option<u32>,
    pub conditions_completed_once: Option<u32>,
}

/// Non-error outcome of one `continue-detective` round trip.
///
/// Variants are mutually exclusive. When a response matches more than one
/// shape the adapter picks by priority: transition, then final report, then
/// continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnResponse {
    /// The current condition is done; the next condition's first question follows.
    Transition {
        verdict: AssessmentVerdict,
        snapshot: Option<AssessmentMap>,
        next: QuestionPayload,
    },
    /// The investigation is exhausted.
    FinalReport(FinalReportPayload),
    /// Another question within the same investigation.
    Continuation {
        next: QuestionPayload,
        snapshot: Option<AssessmentMap>,
    },
}

/// Response to `stop-detective`; every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StopResponse {
    pub assessments: Option<AssessmentMap>,
    pub total_questions: Option<u32>,
    pub conditions_assessed: Option<u32>,
}
