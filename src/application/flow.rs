//! FlowController - the top-level screening flow.
//!
//! Owns the phase sequence `Welcome -> ContextIntake -> Questionnaire ->
//! Interview -> Report` and the data each phase hands to the next. The
//! interview itself is delegated to an `InterviewCoordinator`, exposed as an
//! `Arc` so a presentation layer can issue `stop()` while a submit is pending.

use std::sync::Arc;

use crate::config::InterviewConfig;
use crate::domain::flow::FlowPhase;
use crate::domain::foundation::{DomainError, StateMachine};
use crate::domain::intake::{ContextField, ContextIntake, FieldErrors, UserContext};
use crate::domain::interview::{InterviewError, InterviewQuestion, InterviewState};
use crate::domain::questionnaire::{
    default_questions, AnswerOutcome, AnswerSet, Question, QuestionView, QuestionnaireError,
    QuestionnaireRunner,
};
use crate::domain::report::{RankedReport, Report};
use crate::ports::{
    DiagnoseRequest, DiagnosisOutcome, InferenceError, InferenceService, ScreeningResult,
    StartRequest,
};

use super::interview::{InterviewCoordinator, StopOutcome, SubmitOutcome};

/// Errors raised by flow operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FlowError {
    #[error("operation requires the {expected} phase, flow is in {actual}")]
    WrongPhase {
        expected: FlowPhase,
        actual: FlowPhase,
    },

    #[error("context is incomplete: {0}")]
    Incomplete(FieldErrors),

    #[error(transparent)]
    Questionnaire(#[from] QuestionnaireError),

    #[error("diagnosis failed: {0}")]
    Diagnosis(InferenceError),

    #[error(transparent)]
    Interview(#[from] InterviewError),

    #[error(transparent)]
    Transition(#[from] DomainError),
}

/// Result of answering a questionnaire question.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionnaireStep {
    /// The next questionnaire question is current. `position` is 1-based.
    Advanced { position: usize },
    /// The questionnaire was submitted and the interview opened on this question.
    InterviewStarted(InterviewQuestion),
}

/// Drives one user through the whole screening flow.
pub struct FlowController {
    service: Arc<dyn InferenceService>,
    interview_config: InterviewConfig,
    questions: Vec<Question>,
    phase: FlowPhase,
    intake: ContextIntake,
    context: Option<UserContext>,
    questionnaire: Option<QuestionnaireRunner>,
    answers: Option<AnswerSet>,
    diagnosis: Option<DiagnosisOutcome>,
    interview: Option<Arc<InterviewCoordinator>>,
    report: Option<Report>,
}

impl FlowController {
    /// Creates a flow on the Welcome screen with the built-in questionnaire.
    pub fn new(service: Arc<dyn InferenceService>, interview_config: InterviewConfig) -> Self {
        Self {
            service,
            interview_config,
            questions: default_questions(),
            phase: FlowPhase::Welcome,
            intake: ContextIntake::new(),
            context: None,
            questionnaire: None,
            answers: None,
            diagnosis: None,
            interview: None,
            report: None,
        }
    }

    /// Replaces the questionnaire catalog.
    pub fn with_questions(mut self, questions: Vec<Question>) -> Self {
        self.questions = questions;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub fn intake(&self) -> &ContextIntake {
        &self.intake
    }

    /// The validated context, once intake has been submitted.
    pub fn context(&self) -> Option<&UserContext> {
        self.context.as_ref()
    }

    /// The current questionnaire view, while in the Questionnaire phase.
    pub fn current_question(&self) -> Option<QuestionView<'_>> {
        self.questionnaire.as_ref().map(QuestionnaireRunner::current)
    }

    /// The submitted questionnaire answers.
    pub fn answers(&self) -> Option<&AnswerSet> {
        self.answers.as_ref()
    }

    /// Screening results from the diagnose call, for display.
    pub fn screening(&self) -> &[ScreeningResult] {
        self.diagnosis
            .as_ref()
            .map(|d| d.screening.as_slice())
            .unwrap_or(&[])
    }

    /// The running interview.
    pub fn interview(&self) -> Option<Arc<InterviewCoordinator>> {
        self.interview.clone()
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    /// The report ranked for display.
    pub fn ranked_report(&self) -> Option<RankedReport> {
        self.report.as_ref().map(Report::ranked)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Welcome and context intake
    // ─────────────────────────────────────────────────────────────────────────

    /// Leaves the Welcome screen for context intake.
    pub fn begin(&mut self) -> Result<(), FlowError> {
        self.advance(FlowPhase::ContextIntake)
    }

    /// Returns from context intake to Welcome, keeping the draft.
    pub fn back(&mut self) -> Result<(), FlowError> {
        self.require(FlowPhase::ContextIntake)?;
        self.advance(FlowPhase::Welcome)
    }

    /// Edits one context field.
    pub fn set_context_field(&mut self, field: ContextField, value: impl Into<String>) -> Result<(), FlowError> {
        self.require(FlowPhase::ContextIntake)?;
        self.intake.set_field(field, value);
        Ok(())
    }

    /// Submits the context and opens the questionnaire.
    ///
    /// # Errors
    ///
    /// - `Incomplete` with every missing required field; the flow stays in intake
    pub fn submit_context(&mut self) -> Result<(), FlowError> {
        self.require(FlowPhase::ContextIntake)?;
        let context = self.intake.submit().map_err(|errors| {
            tracing::debug!(missing = errors.len(), "context rejected");
            FlowError::Incomplete(errors)
        })?;
        let runner = QuestionnaireRunner::new(self.questions.clone())?;

        self.advance(FlowPhase::Questionnaire)?;
        self.context = Some(context);
        self.questionnaire = Some(runner);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Questionnaire
    // ─────────────────────────────────────────────────────────────────────────

    /// Answers the current questionnaire question.
    ///
    /// Answering the last question submits the answers, runs the diagnosis and
    /// opens the interview.
    ///
    /// # Errors
    ///
    /// - `Questionnaire` if the option is not offered or no question is current
    /// - `Diagnosis` / `Interview` if opening the interview failed; the flow
    ///   is then in the Interview phase with a faulted session
    pub async fn answer_question(&mut self, option: &str) -> Result<QuestionnaireStep, FlowError> {
        self.require(FlowPhase::Questionnaire)?;
        let runner = self
            .questionnaire
            .as_mut()
            .ok_or(FlowError::WrongPhase {
                expected: FlowPhase::Questionnaire,
                actual: self.phase,
            })?;

        match runner.answer(option)? {
            AnswerOutcome::Advanced { position } => Ok(QuestionnaireStep::Advanced { position }),
            AnswerOutcome::Completed(answers) => {
                tracing::info!(answers = answers.len(), "questionnaire submitted");
                self.answers = Some(answers);
                self.questionnaire = None;
                self.advance(FlowPhase::Interview)?;
                let question = self.open_interview().await?;
                Ok(QuestionnaireStep::InterviewStarted(question))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Interview
    // ─────────────────────────────────────────────────────────────────────────

    /// Submits an interview answer, moving to the Report phase when the interview ends.
    pub async fn submit_answer(&mut self, option: &str) -> Result<SubmitOutcome, FlowError> {
        let interview = self.current_interview()?;
        let outcome = interview.submit(option).await?;
        if let Some(report) = outcome.report() {
            self.complete(report.clone())?;
        }
        Ok(outcome)
    }

    /// Retries after a transient failure.
    pub async fn retry(&mut self) -> Result<InterviewQuestion, FlowError> {
        let interview = self.current_interview()?;
        Ok(interview.retry().await?)
    }

    /// Stops the interview early. Returns the report once the interview has ended.
    pub async fn stop_interview(&mut self) -> Result<Option<Report>, FlowError> {
        let interview = self.current_interview()?;
        let report = match interview.stop().await {
            StopOutcome::Stopped(report) | StopOutcome::AlreadyEnded(Some(report)) => Some(report),
            StopOutcome::Queued | StopOutcome::AlreadyEnded(None) | StopOutcome::NoSession => None,
        };
        if let Some(report) = &report {
            self.complete(report.clone())?;
        }
        Ok(report)
    }

    /// Picks up a report produced by a stop issued directly on the coordinator.
    pub async fn sync_report(&mut self) -> Result<Option<&Report>, FlowError> {
        if self.phase == FlowPhase::Interview {
            if let Some(interview) = self.interview.clone() {
                if let Some(report) = interview.snapshot().await.report().cloned() {
                    self.complete(report)?;
                }
            }
        }
        Ok(self.report.as_ref())
    }

    /// Discards a failed session and opens a fresh one with the same
    /// context and answers.
    ///
    /// # Errors
    ///
    /// - `Interview(InvalidState)` unless the current session faulted with a
    ///   failure that `retry` cannot recover
    pub async fn restart_interview(&mut self) -> Result<InterviewQuestion, FlowError> {
        self.require(FlowPhase::Interview)?;
        if let Some(interview) = &self.interview {
            let session = interview.snapshot().await;
            let retryable = session.fault().map(|f| f.retryable).unwrap_or(false);
            if session.state() != InterviewState::Faulted || retryable {
                return Err(InterviewError::invalid_state("restart the interview", session.state()).into());
            }
        }
        tracing::info!("restarting interview");
        self.open_interview().await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Report
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns to Welcome, clearing everything collected.
    pub fn restart(&mut self) -> Result<(), FlowError> {
        self.require(FlowPhase::Report)?;
        self.advance(FlowPhase::Welcome)?;
        self.intake = ContextIntake::new();
        self.context = None;
        self.questionnaire = None;
        self.answers = None;
        self.diagnosis = None;
        self.interview = None;
        self.report = None;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    async fn open_interview(&mut self) -> Result<InterviewQuestion, FlowError> {
        let (context, answers) = match (&self.context, &self.answers) {
            (Some(context), Some(answers)) => (context.clone(), answers.clone()),
            _ => {
                return Err(FlowError::WrongPhase {
                    expected: FlowPhase::Questionnaire,
                    actual: self.phase,
                })
            }
        };

        let coordinator = Arc::new(InterviewCoordinator::new(
            self.service.clone(),
            self.interview_config.clone(),
        ));
        self.interview = Some(coordinator.clone());
        self.diagnosis = None;

        let diagnosed = tokio::time::timeout(
            self.interview_config.turn_timeout(),
            self.service.diagnose(DiagnoseRequest::new(context, answers)),
        )
        .await
        .unwrap_or_else(|_| Err(InferenceError::timeout(self.interview_config.turn_timeout_secs)));

        let diagnosis = match diagnosed {
            Ok(diagnosis) => diagnosis,
            Err(err) => {
                tracing::warn!(error = %err, "diagnosis failed");
                coordinator.abort_start(err.clone()).await;
                return Err(FlowError::Diagnosis(err));
            }
        };
        tracing::info!(conditions = diagnosis.screening.len(), "diagnosis received");

        let request = StartRequest::from_diagnosis(&diagnosis);
        self.diagnosis = Some(diagnosis);
        Ok(coordinator.start(request).await?)
    }

    fn current_interview(&self) -> Result<Arc<InterviewCoordinator>, FlowError> {
        self.require(FlowPhase::Interview)?;
        self.interview.clone().ok_or(FlowError::WrongPhase {
            expected: FlowPhase::Interview,
            actual: self.phase,
        })
    }

    fn complete(&mut self, report: Report) -> Result<(), FlowError> {
        if self.phase == FlowPhase::Report {
            return Ok(());
        }
        self.advance(FlowPhase::Report)?;
        self.report = Some(report);
        Ok(())
    }

    fn require(&self, expected: FlowPhase) -> Result<(), FlowError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(FlowError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn advance(&mut self, target: FlowPhase) -> Result<(), FlowError> {
        let from = self.phase;
        self.phase = self.phase.transition_to(target)?;
        tracing::info!(from = %from, to = %target, "flow phase changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MockCall, MockInferenceService};
    use crate::domain::foundation::{ConditionId, Percentage, SessionToken};
    use crate::domain::interview::{
        AssessmentVerdict, FinalReportPayload, QuestionPayload, StartResponse, StopResponse,
        TurnResponse,
    };
    use crate::domain::assessment::Confidence;
    use crate::domain::questionnaire::QuestionCategory;
    use serde_json::json;

    fn two_questions() -> Vec<Question> {
        vec![
            Question::new(1, "Stress?", ["Low", "High"], QuestionCategory::MentalHealth),
            Question::new(2, "Sleep?", ["Good", "Poor"], QuestionCategory::Lifestyle),
        ]
    }

    fn start_response() -> StartResponse {
        StartResponse {
            session_id: SessionToken::new("s1").unwrap(),
            first: QuestionPayload {
                question: InterviewQuestion::new("Thirsty often?", ["Yes", "No"]),
                condition: ConditionId::new("diabetes").unwrap(),
                questions_asked: 1,
            },
            can_stop: true,
        }
    }

    fn diagnosis() -> DiagnosisOutcome {
        DiagnosisOutcome {
            payload: json!({"predictions": {"diabetes": {"probability": 0.4}}}),
            user_assessment: json!({"summary": "ok"}),
            screening: Vec::new(),
        }
    }

    fn flow(mock: &MockInferenceService) -> FlowController {
        let config = InterviewConfig {
            transition_dwell_ms: 0,
            typing_delay_ms: 0,
            ..Default::default()
        };
        FlowController::new(Arc::new(mock.clone()), config).with_questions(two_questions())
    }

    fn fill_required(flow: &mut FlowController) {
        for field in ContextField::REQUIRED {
            flow.set_context_field(field, "x").unwrap();
        }
    }

    async fn in_interview(mock: &MockInferenceService) -> FlowController {
        let mut flow = flow(mock);
        flow.begin().unwrap();
        fill_required(&mut flow);
        flow.submit_context().unwrap();
        flow.answer_question("Low").await.unwrap();
        flow.answer_question("Poor").await.unwrap();
        flow
    }

    mod intake {
        use super::*;

        #[test]
        fn incomplete_context_stays_in_intake() {
            let mut flow = flow(&MockInferenceService::new());
            flow.begin().unwrap();
            flow.set_context_field(ContextField::Age, "45").unwrap();

            let err = flow.submit_context().unwrap_err();

            assert!(matches!(err, FlowError::Incomplete(ref e) if e.get(ContextField::Gender).is_some()));
            assert_eq!(flow.phase(), FlowPhase::ContextIntake);
            assert_eq!(flow.intake().draft().age, "45");
        }

        #[test]
        fn back_returns_to_welcome_keeping_draft() {
            let mut flow = flow(&MockInferenceService::new());
            flow.begin().unwrap();
            flow.set_context_field(ContextField::Age, "45").unwrap();

            flow.back().unwrap();

            assert_eq!(flow.phase(), FlowPhase::Welcome);
            assert_eq!(flow.intake().draft().age, "45");
        }

        #[test]
        fn cannot_edit_context_from_welcome() {
            let mut flow = flow(&MockInferenceService::new());
            assert!(matches!(
                flow.set_context_field(ContextField::Age, "45"),
                Err(FlowError::WrongPhase { .. })
            ));
        }
    }

    mod questionnaire {
        use super::*;

        #[tokio::test]
        async fn last_answer_diagnoses_then_starts_interview() {
            let mock = MockInferenceService::new()
                .with_diagnosis(diagnosis())
                .with_start(start_response());
            let mut flow = flow(&mock);
            flow.begin().unwrap();
            fill_required(&mut flow);
            flow.submit_context().unwrap();

            let first = flow.answer_question("High").await.unwrap();
            assert_eq!(first, QuestionnaireStep::Advanced { position: 2 });
            assert_eq!(mock.call_count(), 0);

            let step = flow.answer_question("Good").await.unwrap();

            match step {
                QuestionnaireStep::InterviewStarted(q) => assert_eq!(q.text, "Thirsty often?"),
                other => panic!("expected interview start, got {:?}", other),
            }
            assert_eq!(flow.phase(), FlowPhase::Interview);
            let calls = mock.get_calls();
            assert_eq!(calls.len(), 2);
            match &calls[1] {
                MockCall::Start(request) => {
                    assert_eq!(request.diagnosis_data, diagnosis().payload);
                    assert_eq!(request.user_assessment, json!({"summary": "ok"}));
                }
                other => panic!("expected start call, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn invalid_option_keeps_question() {
            let mut flow = flow(&MockInferenceService::new());
            flow.begin().unwrap();
            fill_required(&mut flow);
            flow.submit_context().unwrap();

            let err = flow.answer_question("Medium").await.unwrap_err();

            assert!(matches!(err, FlowError::Questionnaire(QuestionnaireError::InvalidOption { .. })));
            assert!(matches!(
                flow.current_question(),
                Some(QuestionView::Active { position: 1, .. })
            ));
        }
    }

    mod interview {
        use super::*;

        #[tokio::test]
        async fn failed_diagnosis_leaves_faulted_interview_and_restart_recovers() {
            let mock = MockInferenceService::new()
                .with_diagnosis_error(InferenceError::service("model offline"))
                .with_diagnosis(diagnosis())
                .with_start(start_response());
            let mut flow = flow(&mock);
            flow.begin().unwrap();
            fill_required(&mut flow);
            flow.submit_context().unwrap();
            flow.answer_question("Low").await.unwrap();

            let err = flow.answer_question("Poor").await.unwrap_err();
            assert!(matches!(err, FlowError::Diagnosis(_)));
            assert_eq!(flow.phase(), FlowPhase::Interview);
            let session = flow.interview().unwrap().snapshot().await;
            assert_eq!(session.state(), InterviewState::Faulted);

            let question = flow.restart_interview().await.unwrap();
            assert_eq!(question.text, "Thirsty often?");
            let calls = mock.get_calls();
            assert!(matches!(calls[0], MockCall::Diagnose(_)));
            assert!(matches!(calls[1], MockCall::Diagnose(ref r) if r.answers.len() == 2));
        }

        #[tokio::test]
        async fn restart_keeps_a_live_session() {
            let mock = MockInferenceService::new()
                .with_diagnosis(diagnosis())
                .with_start(start_response())
                .with_turn(TurnResponse::Transition {
                    verdict: AssessmentVerdict {
                        confidence: Confidence::Percent(Percentage::new(70)),
                        comment: String::new(),
                        indicators: Vec::new(),
                    },
                    snapshot: None,
                    next: QuestionPayload {
                        question: InterviewQuestion::new("Headaches?", ["Yes", "No"]),
                        condition: ConditionId::new("hypertension").unwrap(),
                        questions_asked: 2,
                    },
                });
            let mut flow = in_interview(&mock).await;
            flow.submit_answer("Yes").await.unwrap();
            let calls_before = mock.call_count();

            let err = flow.restart_interview().await.unwrap_err();

            assert!(matches!(err, FlowError::Interview(InterviewError::InvalidState { .. })));
            let session = flow.interview().unwrap().snapshot().await;
            assert_eq!(session.state(), InterviewState::AwaitingAnswer);
            assert_eq!(session.assessments().len(), 1);
            assert_eq!(mock.call_count(), calls_before);
        }

        #[tokio::test]
        async fn restart_keeps_an_unsynced_report() {
            let mock = MockInferenceService::new()
                .with_diagnosis(diagnosis())
                .with_start(start_response());
            let mut flow = in_interview(&mock).await;
            flow.interview().unwrap().stop().await;
            let calls_before = mock.call_count();

            let err = flow.restart_interview().await.unwrap_err();

            assert!(matches!(err, FlowError::Interview(InterviewError::InvalidState { .. })));
            assert_eq!(mock.call_count(), calls_before);
            let report = flow.sync_report().await.unwrap().cloned();
            assert!(report.map(|r| r.stopped_by_user()).unwrap_or(false));
        }

        #[tokio::test]
        async fn restart_is_refused_while_retry_can_recover() {
            let mock = MockInferenceService::new()
                .with_diagnosis(diagnosis())
                .with_start(start_response())
                .with_turn_error(InferenceError::network("connection reset"));
            let mut flow = in_interview(&mock).await;
            assert!(flow.submit_answer("Yes").await.is_err());

            let err = flow.restart_interview().await.unwrap_err();

            assert!(matches!(err, FlowError::Interview(InterviewError::InvalidState { .. })));
            assert!(flow.retry().await.is_ok());
        }

        #[tokio::test]
        async fn final_report_moves_flow_to_report() {
            let mock = MockInferenceService::new()
                .with_diagnosis(diagnosis())
                .with_start(start_response())
                .with_turn(TurnResponse::FinalReport(FinalReportPayload {
                    total_questions: Some(4),
                    ..Default::default()
                }));
            let mut flow = in_interview(&mock).await;

            let outcome = flow.submit_answer("Yes").await.unwrap();

            assert!(matches!(outcome, SubmitOutcome::Finished(_)));
            assert_eq!(flow.phase(), FlowPhase::Report);
            assert_eq!(flow.report().map(|r| r.total_questions), Some(4));
        }

        #[tokio::test]
        async fn stop_moves_flow_to_report() {
            let mock = MockInferenceService::new()
                .with_diagnosis(diagnosis())
                .with_start(start_response())
                .with_stop(StopResponse::default());
            let mut flow = in_interview(&mock).await;

            let report = flow.stop_interview().await.unwrap().unwrap();

            assert!(report.stopped_by_user());
            assert_eq!(flow.phase(), FlowPhase::Report);
            assert!(flow.ranked_report().map(|r| r.is_empty()).unwrap_or(false));
        }

        #[tokio::test]
        async fn stop_issued_on_coordinator_is_picked_up() {
            let mock = MockInferenceService::new()
                .with_diagnosis(diagnosis())
                .with_start(start_response());
            let mut flow = in_interview(&mock).await;

            flow.interview().unwrap().stop().await;
            let report = flow.sync_report().await.unwrap().cloned();

            assert!(report.map(|r| r.stopped_by_user()).unwrap_or(false));
            assert_eq!(flow.phase(), FlowPhase::Report);
        }
    }

    mod report {
        use super::*;

        #[tokio::test]
        async fn restart_clears_everything() {
            let mock = MockInferenceService::new()
                .with_diagnosis(diagnosis())
                .with_start(start_response());
            let mut flow = in_interview(&mock).await;
            flow.stop_interview().await.unwrap();

            flow.restart().unwrap();

            assert_eq!(flow.phase(), FlowPhase::Welcome);
            assert!(flow.context().is_none());
            assert!(flow.answers().is_none());
            assert!(flow.interview().is_none());
            assert!(flow.report().is_none());
            assert!(flow.intake().draft().age.is_empty());
        }

        #[test]
        fn restart_outside_report_is_rejected() {
            let mut flow = flow(&MockInferenceService::new());
            assert!(matches!(flow.restart(), Err(FlowError::WrongPhase { .. })));
        }
    }
}
