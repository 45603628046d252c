//! State machine trait for lifecycle enums.
//!
//! Shared by the interview session state (`InterviewState`) and the
//! top-level flow phase (`FlowPhase`), so both validate transitions the
//! same way and report illegal moves with the same error code.

use super::{DomainError, ErrorCode};

/// Trait for status enums that represent state machines.
///
/// Implementors define the edge set; validated transitions come for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for FlowPhase {
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Welcome => vec![ContextIntake],
///             ContextIntake => vec![Welcome, Questionnaire],
///             // ... etc
///         }
///     }
/// }
///
/// let next = FlowPhase::Welcome.transition_to(FlowPhase::ContextIntake)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
