//! Application layer - async orchestration over the domain and ports.
//!
//! The domain aggregates are synchronous; this layer performs the service
//! round trips, applies timeouts and timed displays, and sequences the
//! screening flow.

mod flow;
mod interview;
mod typing;

pub use flow::{FlowController, FlowError, QuestionnaireStep};
pub use interview::{InterviewCoordinator, StopOutcome, SubmitOutcome};
pub use typing::TypingIndicator;
