//! Report ranking - orders condition assessments for display.
//!
//! The service scores conditions either numerically or by risk category.
//! A report is ranked by whichever schema its records use; records missing
//! the chosen field fall back to zero or the lowest tier.

use serde::{Deserialize, Serialize};

use crate::domain::assessment::{AssessmentMap, ConditionAssessment, RiskBand};
use crate::domain::foundation::Percentage;

/// Which confidence representation drives the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingSchema {
    Numeric,
    RiskLevel,
}

/// One ranked row of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCondition {
    /// 1-based position.
    pub rank: usize,
    pub label: String,
    pub assessment: ConditionAssessment,
}

impl RankedCondition {
    /// Risk band for numeric confidence; `None` for categorical records.
    pub fn risk_band(&self) -> Option<RiskBand> {
        self.assessment.confidence.percent().map(RiskBand::for_percentage)
    }
}

/// Assessments ordered most to least concerning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedReport {
    pub entries: Vec<RankedCondition>,
    pub average_confidence: Percentage,
    pub schema: RankingSchema,
}

impl RankedReport {
    /// Ranks assessments descending by confidence or severity.
    ///
    /// The sort is stable: ties keep discovery order. The average is the
    /// rounded mean over all entries, with non-numeric entries counted as
    /// zero, and is zero for an empty map.
    pub fn from_assessments(assessments: &AssessmentMap) -> Self {
        let schema = if assessments.iter().any(|a| a.confidence.is_numeric()) {
            RankingSchema::Numeric
        } else {
            RankingSchema::RiskLevel
        };

        let mut ordered: Vec<&ConditionAssessment> = assessments.iter().collect();
        match schema {
            RankingSchema::Numeric => {
                ordered.sort_by(|a, b| b.confidence.percent_or_zero().cmp(&a.confidence.percent_or_zero()))
            }
            RankingSchema::RiskLevel => ordered
                .sort_by(|a, b| b.confidence.severity_or_lowest().cmp(&a.confidence.severity_or_lowest())),
        }

        let average_confidence =
            Percentage::rounded_mean(ordered.iter().map(|a| a.confidence.percent_or_zero()));

        let entries = ordered
            .into_iter()
            .enumerate()
            .map(|(i, assessment)| RankedCondition {
                rank: i + 1,
                label: assessment.condition.label(),
                assessment: assessment.clone(),
            })
            .collect();

        Self {
            entries,
            average_confidence,
            schema,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Condition ids in rank order.
    pub fn order(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.assessment.condition.as_str()).collect()
    }
}
