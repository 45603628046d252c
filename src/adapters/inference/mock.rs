//! Mock inference service for testing.
//!
//! Scripted per endpoint: each call pops the next configured outcome for
//! that endpoint, so tests can drive any interview transcript without a
//! running service.
//!
//! # Features
//!
//! - Per-endpoint response queues
//! - Simulated latency for timeout and queued-stop testing
//! - Call recording for verification
//!
//! # Example
//!
//! ```ignore
//! let service = MockInferenceService::new()
//!     .with_start(start_response)
//!     .with_turn_error(InferenceError::service("session expired"));
//!
//! let start = service.start_interview(request).await?;
//! assert_eq!(service.call_count(), 1);
//! ```

use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::SessionToken;
use crate::domain::interview::{StartResponse, StopResponse, TurnRequest, TurnResponse};
use crate::ports::{
    DiagnoseRequest, DiagnosisOutcome, InferenceError, InferenceService, StartRequest,
};

/// A recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Diagnose(DiagnoseRequest),
    Start(StartRequest),
    Continue(TurnRequest),
    Stop(SessionToken),
}

type Queue<T> = Arc<Mutex<VecDeque<Result<T, InferenceError>>>>;

/// Mock inference service.
#[derive(Debug, Clone, Default)]
pub struct MockInferenceService {
    diagnoses: Queue<DiagnosisOutcome>,
    starts: Queue<StartResponse>,
    turns: Queue<TurnResponse>,
    stops: Queue<StopResponse>,
    delay: Duration,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockInferenceService {
    /// Creates a mock with empty queues.
    ///
    /// Unscripted calls: `diagnose` succeeds with an empty document, `stop`
    /// succeeds with an empty response, `start` and `continue` fail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a diagnose outcome.
    pub fn with_diagnosis(self, outcome: DiagnosisOutcome) -> Self {
        lock(&self.diagnoses).push_back(Ok(outcome));
        self
    }

    /// Queues a diagnose failure.
    pub fn with_diagnosis_error(self, error: InferenceError) -> Self {
        lock(&self.diagnoses).push_back(Err(error));
        self
    }

    /// Queues a start response.
    pub fn with_start(self, response: StartResponse) -> Self {
        lock(&self.starts).push_back(Ok(response));
        self
    }

    /// Queues a start failure.
    pub fn with_start_error(self, error: InferenceError) -> Self {
        lock(&self.starts).push_back(Err(error));
        self
    }

    /// Queues a turn response.
    pub fn with_turn(self, response: TurnResponse) -> Self {
        lock(&self.turns).push_back(Ok(response));
        self
    }

    /// Queues a turn failure.
    pub fn with_turn_error(self, error: InferenceError) -> Self {
        lock(&self.turns).push_back(Err(error));
        self
    }

    /// Queues a stop response.
    pub fn with_stop(self, response: StopResponse) -> Self {
        lock(&self.stops).push_back(Ok(response));
        self
    }

    /// Queues a stop failure.
    pub fn with_stop_error(self, error: InferenceError) -> Self {
        lock(&self.stops).push_back(Err(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    /// Returns the number of recorded stop calls.
    pub fn stop_count(&self) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|c| matches!(c, MockCall::Stop(_)))
            .count()
    }

    async fn record(&self, call: MockCall) {
        lock(&self.calls).push(call);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl InferenceService for MockInferenceService {
    async fn diagnose(&self, request: DiagnoseRequest) -> Result<DiagnosisOutcome, InferenceError> {
        self.record(MockCall::Diagnose(request)).await;
        lock(&self.diagnoses).pop_front().unwrap_or_else(|| {
            Ok(DiagnosisOutcome {
                payload: json!({}),
                user_assessment: json!({}),
                screening: Vec::new(),
            })
        })
    }

    async fn start_interview(&self, request: StartRequest) -> Result<StartResponse, InferenceError> {
        self.record(MockCall::Start(request)).await;
        lock(&self.starts)
            .pop_front()
            .unwrap_or_else(|| Err(InferenceError::service("no scripted start response")))
    }

    async fn continue_interview(&self, request: TurnRequest) -> Result<TurnResponse, InferenceError> {
        self.record(MockCall::Continue(request)).await;
        lock(&self.turns)
            .pop_front()
            .unwrap_or_else(|| Err(InferenceError::service("no scripted turn response")))
    }

    async fn stop_interview(&self, session_id: &SessionToken) -> Result<StopResponse, InferenceError> {
        self.record(MockCall::Stop(session_id.clone())).await;
        lock(&self.stops)
            .pop_front()
            .unwrap_or_else(|| Ok(StopResponse::default()))
    }
}
