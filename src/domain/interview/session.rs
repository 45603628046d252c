//! InterviewSession aggregate - the adaptive interview state machine.
//!
//! Pure and synchronous. Every network round trip is split into a `begin_*`
//! step that validates and produces the request, and an `apply_*` step that
//! folds the typed outcome back in. The async driver performs the I/O in
//! between without holding the session.
//!
//! # Turn outcomes
//!
//! `apply_turn` selects exactly one outcome per response, in priority order:
//!
//! 1. Error: the session faults; nothing else changes
//! 2. Transition: the verdict is recorded for the current condition and the
//!    next condition's first question is staged behind a timed display
//! 3. Final report: the session terminates with `TerminalCause::FinalReport`
//! 4. Continuation: the next question is installed immediately

use crate::domain::assessment::{AssessmentMap, ConditionAssessment, InvestigationHistoryEntry};
use crate::domain::foundation::{ConditionId, InterviewId, SessionToken, StateMachine};
use crate::domain::report::{Report, TerminalCause};
use crate::ports::InferenceError;

use super::errors::{InterviewError, InterviewFault};
use super::state::InterviewState;
use super::turn::{
    InterviewQuestion, QuestionPayload, StartResponse, StopResponse, TurnRequest, TurnResponse,
};

/// What `apply_turn` did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnApplied {
    /// A new question within the current investigation is ready.
    NextQuestion,
    /// A condition was completed; the session is showing it before moving on.
    Transition {
        assessment: ConditionAssessment,
        next_condition: ConditionId,
    },
    /// The investigation is exhausted.
    Finished(Report),
    /// A stop was queued during the round trip; the response was dropped.
    Discarded,
}

/// How a stop request must be carried out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopDisposition {
    /// Call the stop endpoint now with this session id, then `apply_stop`.
    Immediate(SessionToken),
    /// A round trip is outstanding; whoever owns it performs the stop.
    Queued,
    /// The interview already ended; nothing to do.
    AlreadyTerminal,
    /// No session was ever opened; nothing to stop.
    NoSession,
}

/// One adaptive interview against the inference service.
///
/// # Invariants
///
/// - `questions_asked` never decreases
/// - A condition enters `assessments` only from a service response
/// - `history` is append-only
/// - `session_id` never changes once issued
/// - `report` is set exactly when `state` is `Terminal`
#[derive(Debug, Clone)]
pub struct InterviewSession {
    id: InterviewId,
    state: InterviewState,
    session_id: Option<SessionToken>,
    current_condition: Option<ConditionId>,
    current_question: Option<InterviewQuestion>,
    questions_asked: u32,
    can_stop: bool,
    assessments: AssessmentMap,
    history: Vec<InvestigationHistoryEntry>,
    staged: Option<QuestionPayload>,
    shown_assessment: Option<ConditionAssessment>,
    fault: Option<InterviewFault>,
    start_in_flight: bool,
    stop_requested: bool,
    report: Option<Report>,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl InterviewSession {
    /// Creates a session waiting to be started.
    pub fn new() -> Self {
        Self {
            id: InterviewId::new(),
            state: InterviewState::Initializing,
            session_id: None,
            current_condition: None,
            current_question: None,
            questions_asked: 0,
            can_stop: false,
            assessments: AssessmentMap::new(),
            history: Vec::new(),
            staged: None,
            shown_assessment: None,
            fault: None,
            start_in_flight: false,
            stop_requested: false,
            report: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Client-side correlation id.
    pub fn id(&self) -> InterviewId {
        self.id
    }

    pub fn state(&self) -> InterviewState {
        self.state
    }

    pub fn session_id(&self) -> Option<&SessionToken> {
        self.session_id.as_ref()
    }

    pub fn current_condition(&self) -> Option<&ConditionId> {
        self.current_condition.as_ref()
    }

    pub fn current_question(&self) -> Option<&InterviewQuestion> {
        self.current_question.as_ref()
    }

    pub fn questions_asked(&self) -> u32 {
        self.questions_asked
    }

    /// Whether the service allows stopping at this point.
    pub fn can_stop(&self) -> bool {
        self.can_stop
    }

    pub fn assessments(&self) -> &AssessmentMap {
        &self.assessments
    }

    pub fn history(&self) -> &[InvestigationHistoryEntry] {
        &self.history
    }

    /// The completed assessment being shown during `ShowingTransition`.
    pub fn shown_assessment(&self) -> Option<&ConditionAssessment> {
        self.shown_assessment.as_ref()
    }

    /// The failure that faulted the session, if any.
    pub fn fault(&self) -> Option<&InterviewFault> {
        self.fault.as_ref()
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Start
    // ─────────────────────────────────────────────────────────────────────────

    /// Marks the start round trip as in flight.
    ///
    /// # Errors
    ///
    /// - `TurnInFlight` if a start is already outstanding
    /// - `InvalidState` once the session has left `Initializing`
    pub fn begin_start(&mut self) -> Result<(), InterviewError> {
        if self.state != InterviewState::Initializing {
            return Err(InterviewError::invalid_state("start", self.state));
        }
        if self.start_in_flight {
            return Err(InterviewError::TurnInFlight);
        }
        self.start_in_flight = true;
        Ok(())
    }

    /// Applies the start outcome.
    ///
    /// On failure the session faults and never becomes interactive; a new
    /// session is required.
    pub fn apply_start(
        &mut self,
        result: Result<StartResponse, InferenceError>,
    ) -> Result<&InterviewQuestion, InterviewError> {
        if self.state != InterviewState::Initializing {
            return Err(InterviewError::invalid_state("apply a start response", self.state));
        }
        self.start_in_flight = false;

        match result {
            Ok(response) => {
                self.advance(InterviewState::AwaitingAnswer)?;
                self.session_id = Some(response.session_id);
                self.can_stop = response.can_stop;
                Ok(self.install(response.first))
            }
            Err(err) => {
                self.advance(InterviewState::Faulted)?;
                self.fault = Some(InterviewFault {
                    retryable: false,
                    ..InterviewFault::from(&err)
                });
                Err(err.into())
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Turns
    // ─────────────────────────────────────────────────────────────────────────

    /// Validates an answer and moves to `Submitting`.
    ///
    /// # Errors
    ///
    /// - `Terminal` after the interview ended
    /// - `StopPending` once a stop was requested
    /// - `TurnInFlight` while another answer is outstanding
    /// - `InvalidState` in any other non-interactive state
    /// - `InvalidOption` if the current question does not offer `option`
    pub fn begin_submit(&mut self, option: &str) -> Result<TurnRequest, InterviewError> {
        match self.state {
            InterviewState::Terminal => return Err(InterviewError::Terminal),
            _ if self.stop_requested => return Err(InterviewError::StopPending),
            InterviewState::Submitting => return Err(InterviewError::TurnInFlight),
            InterviewState::AwaitingAnswer => {}
            other => return Err(InterviewError::invalid_state("submit an answer", other)),
        }

        let offered = self
            .current_question
            .as_ref()
            .map(|q| q.offers(option))
            .unwrap_or(false);
        if !offered {
            return Err(InterviewError::InvalidOption(option.to_string()));
        }
        let session_id = self
            .session_id
            .clone()
            .ok_or_else(|| InterviewError::invalid_state("submit without a session", self.state))?;

        self.advance(InterviewState::Submitting)?;
        Ok(TurnRequest {
            session_id,
            answer: option.to_string(),
        })
    }

    /// Applies the outcome of a submitted answer.
    ///
    /// If a stop was queued while the answer was in flight the outcome is
    /// dropped and the session stays in `Submitting` for `apply_stop`.
    ///
    /// # Errors
    ///
    /// - `InvalidState` unless `Submitting`
    /// - `Inference` with the round-trip failure, after faulting the session
    pub fn apply_turn(
        &mut self,
        result: Result<TurnResponse, InferenceError>,
    ) -> Result<TurnApplied, InterviewError> {
        if self.state != InterviewState::Submitting {
            return Err(InterviewError::invalid_state("apply a turn response", self.state));
        }
        if self.stop_requested {
            return Ok(TurnApplied::Discarded);
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                self.advance(InterviewState::Faulted)?;
                self.fault = Some(InterviewFault::from(&err));
                return Err(err.into());
            }
        };

        match response {
            TurnResponse::Transition {
                verdict,
                snapshot,
                next,
            } => {
                let condition = self
                    .current_condition
                    .clone()
                    .ok_or_else(|| InterviewError::invalid_state("record a verdict", self.state))?;
                self.advance(InterviewState::ShowingTransition)?;

                if let Some(snapshot) = snapshot {
                    self.assessments = snapshot;
                }
                let assessment = verdict.into_assessment(condition);
                self.assessments.upsert(assessment.clone());
                self.history.push(InvestigationHistoryEntry::new(assessment.clone()));

                let next_condition = next.condition.clone();
                self.staged = Some(next);
                self.shown_assessment = Some(assessment.clone());
                Ok(TurnApplied::Transition {
                    assessment,
                    next_condition,
                })
            }
            TurnResponse::FinalReport(payload) => {
                self.advance(InterviewState::Terminal)?;
                let assessments = payload.assessments.unwrap_or_else(|| self.assessments.clone());
                let total = payload.total_questions.unwrap_or(self.questions_asked);
                let report = Report::new(TerminalCause::FinalReport, total, assessments, self.history.clone())
                    .with_condition_counts(payload.conditions_assessed, payload.conditions_completed_once);
                self.report = Some(report.clone());
                Ok(TurnApplied::Finished(report))
            }
            TurnResponse::Continuation { next, snapshot } => {
                self.advance(InterviewState::AwaitingAnswer)?;
                if let Some(snapshot) = snapshot {
                    self.assessments = snapshot;
                }
                self.install(next);
                Ok(TurnApplied::NextQuestion)
            }
        }
    }

    /// Ends the transition display and installs the staged next question.
    ///
    /// # Errors
    ///
    /// - `Terminal` if the interview was stopped during the display
    /// - `StopPending` if a stop was requested and has not completed yet
    /// - `InvalidState` unless `ShowingTransition`
    pub fn finish_transition(&mut self) -> Result<&InterviewQuestion, InterviewError> {
        match self.state {
            InterviewState::Terminal => return Err(InterviewError::Terminal),
            _ if self.stop_requested => return Err(InterviewError::StopPending),
            InterviewState::ShowingTransition => {}
            other => return Err(InterviewError::invalid_state("finish a transition", other)),
        }
        let next = self
            .staged
            .take()
            .ok_or_else(|| InterviewError::invalid_state("finish a transition", self.state))?;
        self.advance(InterviewState::AwaitingAnswer)?;
        self.shown_assessment = None;
        Ok(self.install(next))
    }

    /// Returns a faulted session to `AwaitingAnswer` with the unchanged question.
    ///
    /// # Errors
    ///
    /// - `NotRetryable` unless faulted by a retryable failure with a question on screen
    pub fn retry(&mut self) -> Result<&InterviewQuestion, InterviewError> {
        let retryable = self.state == InterviewState::Faulted
            && !self.stop_requested
            && self.session_id.is_some()
            && self.fault.as_ref().map(|f| f.retryable).unwrap_or(false);
        if !retryable {
            return Err(InterviewError::NotRetryable);
        }
        self.advance(InterviewState::AwaitingAnswer)?;
        self.fault = None;
        self.current_question
            .as_ref()
            .ok_or(InterviewError::NotRetryable)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stop
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a stop request and says how to carry it out.
    ///
    /// Repeated calls never produce a second `Immediate`.
    pub fn request_stop(&mut self) -> StopDisposition {
        if self.state == InterviewState::Terminal {
            return StopDisposition::AlreadyTerminal;
        }
        let session_id = match &self.session_id {
            Some(id) => id.clone(),
            None => return StopDisposition::NoSession,
        };
        if self.stop_requested || self.state == InterviewState::Submitting {
            self.stop_requested = true;
            return StopDisposition::Queued;
        }
        self.stop_requested = true;
        StopDisposition::Immediate(session_id)
    }

    /// Returns the session id if a queued stop is waiting to be performed.
    ///
    /// Called by the owner of the in-flight round trip after `Discarded`.
    pub fn take_queued_stop(&self) -> Option<SessionToken> {
        if self.stop_requested && self.state == InterviewState::Submitting {
            self.session_id.clone()
        } else {
            None
        }
    }

    /// Terminates the session as user-stopped, whatever the stop call returned.
    ///
    /// A map returned by the service replaces the local one. Calling this on
    /// a terminal session returns the existing report unchanged.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if `request_stop` never granted a stop
    pub fn apply_stop(
        &mut self,
        result: Result<StopResponse, InferenceError>,
    ) -> Result<Report, InterviewError> {
        if let Some(report) = &self.report {
            return Ok(report.clone());
        }
        if !self.stop_requested || self.session_id.is_none() {
            return Err(InterviewError::invalid_state("apply a stop", self.state));
        }

        self.advance(InterviewState::Terminal)?;
        let response = result.unwrap_or_default();
        let assessments = response
            .assessments
            .unwrap_or_else(|| self.assessments.clone());
        let total = response.total_questions.unwrap_or(self.questions_asked);

        self.staged = None;
        self.shown_assessment = None;
        let report = Report::new(TerminalCause::UserStopped, total, assessments, self.history.clone())
            .with_condition_counts(response.conditions_assessed, None);
        self.report = Some(report.clone());
        Ok(report)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn advance(&mut self, target: InterviewState) -> Result<(), InterviewError> {
        self.state = self.state.transition_to(target)?;
        Ok(())
    }

    fn install(&mut self, payload: QuestionPayload) -> &InterviewQuestion {
        self.questions_asked = self.questions_asked.max(payload.questions_asked);
        self.current_condition = Some(payload.condition);
        self.current_question.insert(payload.question)
    }
}
