//! InterviewState enum for the adaptive interview lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle state of an interview session.
///
/// ```text
/// Initializing ──► AwaitingAnswer ──► Submitting ──► AwaitingAnswer
///      │                 ▲   │            │ ├──────► ShowingTransition ──► AwaitingAnswer
///      │                 │   │            │ └──────► Terminal
///      ▼                 │   ▼            ▼
///   Faulted ─────────────┘ Terminal    Faulted ──► Terminal
/// ```
///
/// `Terminal` has no outgoing edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterviewState {
    /// Waiting for the start round trip.
    #[default]
    Initializing,
    /// A question is displayed and accepts one answer.
    AwaitingAnswer,
    /// An answer is in flight; further answers are rejected.
    Submitting,
    /// Timed, non-interactive display of a completed condition.
    ShowingTransition,
    /// A round trip failed; the session accepts no answers until retried or restarted.
    Faulted,
    /// Final report reached or user stopped.
    Terminal,
}

impl InterviewState {
    /// Returns true if an answer may be submitted.
    pub fn accepts_answers(&self) -> bool {
        matches!(self, InterviewState::AwaitingAnswer)
    }
}

impl StateMachine for InterviewState {
    fn valid_transitions(&self) -> Vec<Self> {
        use InterviewState::*;
        match self {
            Initializing => vec![AwaitingAnswer, Faulted],
            AwaitingAnswer => vec![Submitting, Terminal],
            Submitting => vec![AwaitingAnswer, ShowingTransition, Terminal, Faulted],
            ShowingTransition => vec![AwaitingAnswer, Terminal],
            Faulted => vec![AwaitingAnswer, Terminal],
            Terminal => vec![],
        }
    }
}

impl fmt::Display for InterviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InterviewState::Initializing => "Initializing",
            InterviewState::AwaitingAnswer => "Awaiting answer",
            InterviewState::Submitting => "Submitting",
            InterviewState::ShowingTransition => "Showing transition",
            InterviewState::Faulted => "Faulted",
            InterviewState::Terminal => "Terminal",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InterviewState::*;

    #[test]
    fn default_is_initializing() {
        assert_eq!(InterviewState::default(), Initializing);
    }

    #[test]
    fn only_awaiting_answer_accepts_answers() {
        for state in [Initializing, Submitting, ShowingTransition, Faulted, Terminal] {
            assert!(!state.accepts_answers(), "{:?}", state);
        }
        assert!(AwaitingAnswer.accepts_answers());
    }

    #[test]
    fn terminal_is_terminal() {
        assert!(Terminal.is_terminal());
        assert!(!Faulted.is_terminal());
    }

    #[test]
    fn no_reverse_transition_to_initializing() {
        for state in [AwaitingAnswer, Submitting, ShowingTransition, Faulted, Terminal] {
            assert!(!state.can_transition_to(&Initializing));
        }
    }

    #[test]
    fn awaiting_answer_cannot_skip_submitting() {
        assert!(AwaitingAnswer.transition_to(ShowingTransition).is_err());
        assert!(AwaitingAnswer.transition_to(Faulted).is_err());
    }

    #[test]
    fn initializing_cannot_stop_directly() {
        assert!(!Initializing.can_transition_to(&Terminal));
    }
}
