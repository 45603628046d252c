//! Per-condition assessment records and the ordered assessment map.

use serde::{Deserialize, Serialize};

use super::Confidence;
use crate::domain::foundation::{ConditionId, Timestamp};

/// How far the service got with a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    #[default]
    Partial,
    Assessed,
}

impl AssessmentStatus {
    /// `"assessed"` (any case) is fully assessed; anything else is partial.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().eq_ignore_ascii_case("assessed") => Self::Assessed,
            _ => Self::Partial,
        }
    }

    /// Display label used on the report.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Partial => "Partially assessed",
            Self::Assessed => "Fully assessed",
        }
    }
}

/// The service's verdict on one candidate condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionAssessment {
    pub condition: ConditionId,
    pub confidence: Confidence,
    pub comment: String,
    pub indicators: Vec<String>,
    pub status: AssessmentStatus,
}

impl ConditionAssessment {
    /// Creates a partial assessment with no comment or indicators.
    pub fn new(condition: ConditionId, confidence: Confidence) -> Self {
        Self {
            condition,
            confidence,
            comment: String::new(),
            indicators: Vec::new(),
            status: AssessmentStatus::Partial,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_indicators<S: Into<String>>(mut self, indicators: impl IntoIterator<Item = S>) -> Self {
        self.indicators = indicators.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_status(mut self, status: AssessmentStatus) -> Self {
        self.status = status;
        self
    }
}

/// Condition id → assessment, in discovery order.
///
/// # Invariants
///
/// - Each condition appears at most once
/// - Inserting an existing condition overwrites it in place, keeping its position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssessmentMap(Vec<ConditionAssessment>);

impl AssessmentMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or refines an assessment. Returns the previous value, if any.
    pub fn upsert(&mut self, assessment: ConditionAssessment) -> Option<ConditionAssessment> {
        match self.0.iter_mut().find(|a| a.condition == assessment.condition) {
            Some(slot) => Some(std::mem::replace(slot, assessment)),
            None => {
                self.0.push(assessment);
                None
            }
        }
    }

    pub fn get(&self, condition: &ConditionId) -> Option<&ConditionAssessment> {
        self.0.iter().find(|a| &a.condition == condition)
    }

    pub fn contains(&self, condition: &ConditionId) -> bool {
        self.get(condition).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates assessments in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ConditionAssessment> {
        self.0.iter()
    }
}

impl FromIterator<ConditionAssessment> for AssessmentMap {
    fn from_iter<T: IntoIterator<Item = ConditionAssessment>>(iter: T) -> Self {
        let mut map = Self::new();
        for assessment in iter {
            map.upsert(assessment);
        }
        map
    }
}

impl IntoIterator for AssessmentMap {
    type Item = ConditionAssessment;
    type IntoIter = std::vec::IntoIter<ConditionAssessment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Snapshot of a condition's assessment at the moment the interview moved past it.
///
/// Append-only: entries are never edited once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigationHistoryEntry {
    pub condition: ConditionId,
    pub assessment: ConditionAssessment,
    pub recorded_at: Timestamp,
}

impl InvestigationHistoryEntry {
    pub fn new(assessment: ConditionAssessment) -> Self {
        Self {
            condition: assessment.condition.clone(),
            assessment,
            recorded_at: Timestamp::now(),
        }
    }
}
