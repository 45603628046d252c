//! Wire format of the inference service.
//!
//! Every field is optional on the wire. These structs mirror that shape and
//! are converted once into the typed domain contract; nothing past this
//! module sees an optional wire field.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::assessment::{
    AssessmentMap, AssessmentStatus, ConditionAssessment, Confidence, RiskLevel,
};
use crate::domain::foundation::{ConditionId, SessionToken};
use crate::domain::interview::{
    AssessmentVerdict, FinalReportPayload, InterviewQuestion, QuestionPayload, StartResponse,
    StopResponse, TurnResponse,
};
use crate::ports::{DiagnosisOutcome, InferenceError, ScreeningResult};

/// Question fields shared by start, continuation and `next_question` shapes.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawQuestion {
    question: Option<String>,
    options: Option<Vec<String>>,
    message: Option<String>,
    current_condition: Option<String>,
    questions_asked: Option<u32>,
}

impl RawQuestion {
    fn into_payload(self) -> Result<QuestionPayload, InferenceError> {
        let text = non_empty(self.question).ok_or_else(|| InferenceError::malformed("missing question"))?;
        let options = self
            .options
            .filter(|o| !o.is_empty())
            .ok_or_else(|| InferenceError::malformed("missing options"))?;
        let condition = non_empty(self.current_condition)
            .ok_or_else(|| InferenceError::malformed("missing current_condition"))
            .and_then(|c| ConditionId::new(c).map_err(|e| InferenceError::malformed(e.to_string())))?;

        let mut question = InterviewQuestion::new(text, options);
        question.message = non_empty(self.message);
        Ok(QuestionPayload {
            question,
            condition,
            questions_asked: self.questions_asked.unwrap_or(0),
        })
    }
}

/// Assessment record in any of the service's schemas.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawAssessment {
    confidence: Option<Value>,
    confidence_percentage: Option<Value>,
    risk_level: Option<String>,
    comment: Option<String>,
    #[serde(default)]
    indicators: Vec<Value>,
    status: Option<String>,
}

impl RawAssessment {
    fn confidence(&self) -> Confidence {
        // A textual `confidence` such as "high" is a category, not a score.
        let textual_level = self
            .confidence
            .as_ref()
            .and_then(Value::as_str)
            .filter(|s| s.trim().parse::<f64>().is_err());
        Confidence::resolve(
            self.confidence_percentage.as_ref().and_then(score),
            self.confidence.as_ref().and_then(score),
            self.risk_level.as_deref().or(textual_level),
        )
    }

    fn indicators(&self) -> Vec<String> {
        self.indicators
            .iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect()
    }

    fn into_verdict(self) -> AssessmentVerdict {
        AssessmentVerdict {
            confidence: self.confidence(),
            indicators: self.indicators(),
            comment: self.comment.unwrap_or_default(),
        }
    }

    fn into_assessment(self, condition: ConditionId) -> ConditionAssessment {
        ConditionAssessment {
            condition,
            confidence: self.confidence(),
            indicators: self.indicators(),
            status: AssessmentStatus::parse(self.status.as_deref()),
            comment: self.comment.unwrap_or_default(),
        }
    }
}

/// Converts a condition-keyed object into an ordered map.
///
/// Entries with a blank key or a non-object value are skipped.
fn assessment_map(raw: Map<String, Value>) -> AssessmentMap {
    raw.into_iter()
        .filter_map(|(key, value)| {
            let condition = ConditionId::new(key).ok()?;
            let record: RawAssessment = serde_json::from_value(value).ok()?;
            Some(record.into_assessment(condition))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawStartResponse {
    error: Option<String>,
    session_id: Option<String>,
    can_stop: Option<bool>,
    #[serde(flatten)]
    question: RawQuestion,
}

impl RawStartResponse {
    pub(crate) fn into_domain(self) -> Result<StartResponse, InferenceError> {
        if let Some(message) = non_empty(self.error) {
            return Err(InferenceError::service(message));
        }
        let session_id = non_empty(self.session_id)
            .ok_or_else(|| InferenceError::malformed("missing session_id"))
            .and_then(|s| SessionToken::new(s).map_err(|e| InferenceError::malformed(e.to_string())))?;
        Ok(StartResponse {
            session_id,
            first: self.question.into_payload()?,
            can_stop: self.can_stop.unwrap_or(true),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTurnResponse {
    error: Option<String>,
    moving_to_next: Option<bool>,
    assessment: Option<RawAssessment>,
    all_assessments: Option<Map<String, Value>>,
    next_question: Option<RawQuestion>,
    final_report: Option<bool>,
    all_conditions: Option<Map<String, Value>>,
    detailed_assessments: Option<Map<String, Value>>,
    total_questions: Option<u32>,
    conditions_assessed: Option<Value>,
    conditions_completed_once: Option<Value>,
    #[serde(flatten)]
    question: RawQuestion,
}

impl RawTurnResponse {
    /// Picks exactly one outcome: error, transition, final report, continuation.
    pub(crate) fn into_domain(self) -> Result<TurnResponse, InferenceError> {
        if let Some(message) = non_empty(self.error) {
            return Err(InferenceError::service(message));
        }

        if self.moving_to_next == Some(true) {
            if let Some(assessment) = self.assessment {
                let next = self
                    .next_question
                    .ok_or_else(|| InferenceError::malformed("missing next_question"))?
                    .into_payload()?;
                return Ok(TurnResponse::Transition {
                    verdict: assessment.into_verdict(),
                    snapshot: self.all_assessments.map(assessment_map),
                    next,
                });
            }
        }

        if self.final_report == Some(true) {
            return Ok(TurnResponse::FinalReport(FinalReportPayload {
                assessments: self.all_conditions.or(self.detailed_assessments).map(assessment_map),
                total_questions: self.total_questions,
                conditions_assessed: self.conditions_assessed.as_ref().and_then(count),
                conditions_completed_once: self.conditions_completed_once.as_ref().and_then(count),
            }));
        }

        Ok(TurnResponse::Continuation {
            next: self.question.into_payload()?,
            snapshot: self.all_assessments.map(assessment_map),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawStopResponse {
    error: Option<String>,
    all_conditions: Option<Map<String, Value>>,
    detailed_assessments: Option<Map<String, Value>>,
    all_assessments: Option<Map<String, Value>>,
    total_questions: Option<u32>,
    questions_asked: Option<u32>,
    conditions_assessed: Option<Value>,
}

impl RawStopResponse {
    pub(crate) fn into_domain(self) -> Result<StopResponse, InferenceError> {
        if let Some(message) = non_empty(self.error) {
            return Err(InferenceError::service(message));
        }
        Ok(StopResponse {
            assessments: self
                .all_conditions
                .or(self.detailed_assessments)
                .or(self.all_assessments)
                .map(assessment_map),
            total_questions: self.total_questions.or(self.questions_asked),
            conditions_assessed: self.conditions_assessed.as_ref().and_then(count),
        })
    }
}

/// Converts a diagnose response, keeping the whole document for `start-detective`.
pub(crate) fn diagnosis_from_value(payload: Value) -> Result<DiagnosisOutcome, InferenceError> {
    let object = payload
        .as_object()
        .ok_or_else(|| InferenceError::malformed("diagnose response is not an object"))?;

    if let Some(message) = object.get("error").and_then(Value::as_str).filter(|s| !s.trim().is_empty()) {
        return Err(InferenceError::service(message));
    }

    let screening = object
        .get("predictions")
        .or_else(|| object.get("risk_factors"))
        .map(screening_results)
        .unwrap_or_default();
    let user_assessment = object.get("user_assessment").cloned().unwrap_or(Value::Null);

    Ok(DiagnosisOutcome {
        payload,
        user_assessment,
        screening,
    })
}

#[derive(Debug, Default, Deserialize)]
struct RawPrediction {
    condition: Option<String>,
    display_name: Option<String>,
    probability: Option<Value>,
    risk_level: Option<String>,
    error: Option<String>,
}

impl RawPrediction {
    fn into_result(self, key: Option<String>) -> Option<ScreeningResult> {
        let condition = ConditionId::new(key.or(self.condition)?).ok()?;
        Some(ScreeningResult {
            display_name: non_empty(self.display_name).unwrap_or_else(|| condition.label()),
            probability: self.probability.as_ref().and_then(score),
            risk_level: non_empty(self.risk_level).map(|r| RiskLevel::parse(&r)),
            error: non_empty(self.error),
            condition,
        })
    }
}

/// Accepts predictions keyed by condition or as a list of records.
fn screening_results(raw: &Value) -> Vec<ScreeningResult> {
    let parse = |value: &Value| serde_json::from_value::<RawPrediction>(value.clone()).ok();
    match raw {
        Value::Object(map) => map
            .iter()
            .filter_map(|(key, value)| parse(value)?.into_result(Some(key.clone())))
            .collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(|value| parse(value)?.into_result(None))
            .collect(),
        _ => Vec::new(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Numeric score from a JSON number or numeric string.
fn score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }
}

/// Count from a number or the length of a list.
fn count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::Array(items) => u32::try_from(items.len()).ok(),
        Value::Object(map) => u32::try_from(map.len()).ok(),
        _ => None,
    }
}
