//! InterviewCoordinator - drives an InterviewSession against the inference service.
//!
//! The session lives behind a `tokio::sync::Mutex` that is released before
//! every network await. A `stop()` issued while an answer is in flight sees
//! `Submitting`, is queued, and is carried out by the submitting task as soon
//! as its response arrives (the response itself is dropped).

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::InterviewConfig;
use crate::domain::assessment::ConditionAssessment;
use crate::domain::interview::{
    InterviewError, InterviewQuestion, InterviewSession, StopDisposition, StopResponse,
    TurnApplied,
};
use crate::domain::report::Report;
use crate::ports::{InferenceError, InferenceService, StartRequest};

use super::typing::TypingIndicator;

/// Result of submitting one answer.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The next question of the current investigation is installed.
    NextQuestion(InterviewQuestion),
    /// A condition was completed and shown; the next condition's first question is installed.
    Transitioned {
        assessment: ConditionAssessment,
        next: InterviewQuestion,
    },
    /// The service delivered the final report.
    Finished(Report),
    /// The interview was stopped while this answer was outstanding.
    Stopped(Report),
    /// A stop was requested by another caller and is still in flight.
    Stopping,
}

impl SubmitOutcome {
    /// The report, if this outcome ended the interview.
    pub fn report(&self) -> Option<&Report> {
        match self {
            SubmitOutcome::Finished(report) | SubmitOutcome::Stopped(report) => Some(report),
            _ => None,
        }
    }
}

/// Result of a stop request.
#[derive(Debug, Clone, PartialEq)]
pub enum StopOutcome {
    /// The stop round trip completed and the interview is terminal.
    Stopped(Report),
    /// An answer is in flight; its owner will perform the stop.
    Queued,
    /// The interview had already ended.
    AlreadyEnded(Option<Report>),
    /// No session was ever opened.
    NoSession,
}

struct Inner {
    session: InterviewSession,
    typing: TypingIndicator,
}

/// Async driver for one interview.
pub struct InterviewCoordinator {
    service: Arc<dyn InferenceService>,
    config: InterviewConfig,
    inner: Mutex<Inner>,
}

impl InterviewCoordinator {
    pub fn new(service: Arc<dyn InferenceService>, config: InterviewConfig) -> Self {
        let typing = TypingIndicator::new(config.typing_delay());
        Self {
            service,
            config,
            inner: Mutex::new(Inner {
                session: InterviewSession::new(),
                typing,
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// A copy of the session as it is right now.
    pub async fn snapshot(&self) -> InterviewSession {
        self.inner.lock().await.session.clone()
    }

    /// Whether the current question is still behind the typing indicator.
    pub async fn is_typing(&self) -> bool {
        self.inner.lock().await.typing.is_typing()
    }

    /// Waits until the current question may be shown.
    pub async fn wait_until_visible(&self) {
        let typing = self.inner.lock().await.typing.clone();
        typing.wait().await;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// Opens the session and installs the first question.
    ///
    /// # Errors
    ///
    /// - `InvalidState` / `TurnInFlight` if already started
    /// - `Inference` if the service call failed; the session is left faulted
    pub async fn start(&self, request: StartRequest) -> Result<InterviewQuestion, InterviewError> {
        self.inner.lock().await.session.begin_start()?;

        let result = self.bounded(self.service.start_interview(request)).await;

        let mut inner = self.inner.lock().await;
        match inner.session.apply_start(result).cloned() {
            Ok(question) => {
                inner.typing.restart();
                tracing::info!(
                    interview_id = %inner.session.id(),
                    session_id = ?inner.session.session_id().map(|s| s.as_str()),
                    "interview started"
                );
                Ok(question)
            }
            Err(err) => {
                tracing::warn!(interview_id = %inner.session.id(), error = %err, "interview failed to start");
                Err(err)
            }
        }
    }

    /// Faults the session without calling the service.
    ///
    /// Used when the interview cannot be opened because an earlier step failed.
    pub async fn abort_start(&self, error: InferenceError) -> InterviewError {
        let mut inner = self.inner.lock().await;
        if let Err(err) = inner.session.begin_start() {
            return err;
        }
        match inner.session.apply_start(Err(error)) {
            Err(err) => err,
            Ok(_) => InterviewError::NotRetryable,
        }
    }

    /// Submits an answer and carries the session to its next interactive state.
    ///
    /// A transition is held for the configured dwell before the next question
    /// is installed.
    ///
    /// # Errors
    ///
    /// - Any `begin_submit` rejection; the session is unchanged
    /// - `Inference` if the round trip failed; the session is left faulted
    pub async fn submit(&self, option: &str) -> Result<SubmitOutcome, InterviewError> {
        let request = self.inner.lock().await.session.begin_submit(option)?;
        tracing::debug!(answer = %request.answer, "submitting answer");

        let result = self.bounded(self.service.continue_interview(request)).await;

        let mut inner = self.inner.lock().await;
        let applied = match inner.session.apply_turn(result) {
            Ok(applied) => applied,
            Err(err) => {
                tracing::warn!(
                    interview_id = %inner.session.id(),
                    code = %err.code(),
                    error = %err,
                    "turn failed"
                );
                return Err(err);
            }
        };

        match applied {
            TurnApplied::NextQuestion => {
                inner.typing.restart();
                let next = current_question(&inner.session)?;
                Ok(SubmitOutcome::NextQuestion(next))
            }
            TurnApplied::Finished(report) => {
                tracing::info!(
                    interview_id = %inner.session.id(),
                    total_questions = report.total_questions,
                    conditions = report.assessments.len(),
                    "interview finished"
                );
                Ok(SubmitOutcome::Finished(report))
            }
            TurnApplied::Discarded => {
                let queued = inner.session.take_queued_stop();
                drop(inner);
                tracing::info!("answer discarded for queued stop");
                let result = match queued {
                    Some(session_id) => self.bounded(self.service.stop_interview(&session_id)).await,
                    None => Err(InferenceError::malformed("no session to stop")),
                };
                Ok(SubmitOutcome::Stopped(self.finish_stop(result).await?))
            }
            TurnApplied::Transition {
                assessment,
                next_condition,
            } => {
                tracing::info!(
                    completed = %assessment.condition,
                    confidence = %assessment.confidence,
                    next = %next_condition,
                    "condition completed"
                );
                drop(inner);
                tokio::time::sleep(self.config.transition_dwell()).await;

                let mut inner = self.inner.lock().await;
                match inner.session.finish_transition().cloned() {
                    Ok(next) => {
                        inner.typing.restart();
                        Ok(SubmitOutcome::Transitioned { assessment, next })
                    }
                    Err(InterviewError::Terminal) => match inner.session.report() {
                        Some(report) => Ok(SubmitOutcome::Stopped(report.clone())),
                        None => Err(InterviewError::Terminal),
                    },
                    Err(InterviewError::StopPending) => Ok(SubmitOutcome::Stopping),
                    Err(err) => Err(err),
                }
            }
        }
    }

    /// Returns a faulted session to the question it was on.
    ///
    /// # Errors
    ///
    /// - `NotRetryable` unless the last failure was transient
    pub async fn retry(&self) -> Result<InterviewQuestion, InterviewError> {
        let mut inner = self.inner.lock().await;
        let question = inner.session.retry()?.clone();
        inner.typing.restart();
        tracing::info!(interview_id = %inner.session.id(), "retrying after transient failure");
        Ok(question)
    }

    /// Ends the interview early.
    ///
    /// Repeated calls never reach the service twice. A failed stop call still
    /// ends the interview with the locally known assessments.
    pub async fn stop(&self) -> StopOutcome {
        let disposition = {
            let mut inner = self.inner.lock().await;
            let disposition = inner.session.request_stop();
            if disposition == StopDisposition::AlreadyTerminal {
                return StopOutcome::AlreadyEnded(inner.session.report().cloned());
            }
            disposition
        };

        match disposition {
            StopDisposition::Immediate(session_id) => {
                let result = self.bounded(self.service.stop_interview(&session_id)).await;
                match self.finish_stop(result).await {
                    Ok(report) => StopOutcome::Stopped(report),
                    Err(err) => {
                        tracing::warn!(error = %err, "stop could not be applied");
                        StopOutcome::AlreadyEnded(None)
                    }
                }
            }
            StopDisposition::Queued => {
                tracing::debug!("stop queued behind in-flight answer");
                StopOutcome::Queued
            }
            StopDisposition::NoSession => StopOutcome::NoSession,
            StopDisposition::AlreadyTerminal => StopOutcome::AlreadyEnded(None),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    async fn finish_stop(
        &self,
        result: Result<StopResponse, InferenceError>,
    ) -> Result<Report, InterviewError> {
        if let Err(err) = &result {
            tracing::warn!(error = %err, "stop call failed; ending with local assessments");
        }
        let mut inner = self.inner.lock().await;
        let report = inner.session.apply_stop(result)?;
        tracing::info!(
            interview_id = %inner.session.id(),
            total_questions = report.total_questions,
            conditions = report.assessments.len(),
            "interview stopped by user"
        );
        Ok(report)
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, InferenceError>
    where
        F: Future<Output = Result<T, InferenceError>>,
    {
        match tokio::time::timeout(self.config.turn_timeout(), call).await {
            Ok(result) => result,
            Err(_) => Err(InferenceError::timeout(self.config.turn_timeout_secs)),
        }
    }
}

fn current_question(session: &InterviewSession) -> Result<InterviewQuestion, InterviewError> {
    session
        .current_question()
        .cloned()
        .ok_or_else(|| InterviewError::invalid_state("read the current question", session.state()))
}
