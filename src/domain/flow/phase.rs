//! FlowPhase enum for the top-level screening flow.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Which component of the flow is active.
///
/// Valid transitions:
/// - Welcome -> ContextIntake
/// - ContextIntake -> Questionnaire (after the required-field gate)
/// - ContextIntake -> Welcome (back)
/// - Questionnaire -> Interview
/// - Interview -> Report
/// - Report -> Welcome (restart)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FlowPhase {
    #[default]
    Welcome,
    ContextIntake,
    Questionnaire,
    Interview,
    Report,
}

impl StateMachine for FlowPhase {
    fn valid_transitions(&self) -> Vec<Self> {
        use FlowPhase::*;
        match self {
            Welcome => vec![ContextIntake],
            ContextIntake => vec![Welcome, Questionnaire],
            Questionnaire => vec![Interview],
            Interview => vec![Report],
            Report => vec![Welcome],
        }
    }
}

impl fmt::Display for FlowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlowPhase::Welcome => "Welcome",
            FlowPhase::ContextIntake => "Context intake",
            FlowPhase::Questionnaire => "Questionnaire",
            FlowPhase::Interview => "Interview",
            FlowPhase::Report => "Report",
        };
        write!(f, "{}", s)
    }
}
