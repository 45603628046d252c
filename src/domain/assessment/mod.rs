//! Assessment domain module.
//!
//! Per-condition assessment records as reported by the inference service,
//! with confidence resolved into a single representation.

mod confidence;
mod record;

pub use confidence::{Confidence, RiskBand, RiskLevel};
pub use record::{AssessmentMap, AssessmentStatus, ConditionAssessment, InvestigationHistoryEntry};
