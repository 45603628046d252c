//! Terminal interview report.

use serde::{Deserialize, Serialize};

use super::ranking::RankedReport;
use crate::domain::assessment::{AssessmentMap, InvestigationHistoryEntry};
use crate::domain::foundation::Timestamp;

/// Why the interview ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalCause {
    /// The service signalled the investigation is exhausted.
    FinalReport,
    /// The user asked to stop.
    UserStopped,
}

/// Read-only result of a finished interview, produced once at termination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub total_questions: u32,
    pub assessments: AssessmentMap,
    pub history: Vec<InvestigationHistoryEntry>,
    pub cause: TerminalCause,
    pub conditions_assessed: Option<u32>,
    pub conditions_completed_once: Option<u32>,
    pub generated_at: Timestamp,
}

impl Report {
    pub fn new(
        cause: TerminalCause,
        total_questions: u32,
        assessments: AssessmentMap,
        history: Vec<InvestigationHistoryEntry>,
    ) -> Self {
        Self {
            total_questions,
            assessments,
            history,
            cause,
            conditions_assessed: None,
            conditions_completed_once: None,
            generated_at: Timestamp::now(),
        }
    }

    pub fn with_condition_counts(mut self, assessed: Option<u32>, completed_once: Option<u32>) -> Self {
        self.conditions_assessed = assessed;
        self.conditions_completed_once = completed_once;
        self
    }

    /// Returns true if the user ended the interview early.
    pub fn stopped_by_user(&self) -> bool {
        self.cause == TerminalCause::UserStopped
    }

    /// Ranks the assessments for display.
    pub fn ranked(&self) -> RankedReport {
        RankedReport::from_assessments(&self.assessments)
    }
}
