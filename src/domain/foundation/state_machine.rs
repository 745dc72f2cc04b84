//! State machine trait for lifecycle enums.
//!
//! Provides a consistent interface for validating and performing lifecycle
//! transitions, such as a simulated conversation moving from active to resolved.

use super::ValidationError;

/// Trait for lifecycle enums that represent state machines.
///
/// Implementors list the legal edges; validated transitions and terminal
/// detection come for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for LifecycleState {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Active, Resolved))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Active => vec![Resolved],
///             Resolved => vec![],
///         }
///     }
/// }
///
/// let next = current.transition_to(LifecycleState::Resolved)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
