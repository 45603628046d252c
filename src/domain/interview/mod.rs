//! Interview domain module.
//!
//! The adaptive "detective" interview: a server-issued session that asks
//! one question at a time per candidate condition until the service reports
//! a final assessment or the user stops.

mod errors;
mod session;
mod state;
mod turn;

pub use errors::{InterviewError, InterviewFault};
pub use session::{InterviewSession, StopDisposition, TurnApplied};
pub use state::InterviewState;
pub use turn::{
    AssessmentVerdict, FinalReportPayload, InterviewQuestion, QuestionPayload, StartResponse,
    StopResponse, TurnRequest, TurnResponse,
};
