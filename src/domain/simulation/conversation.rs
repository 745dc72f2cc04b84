//! Per-ticket conversation state machine.
//!
//! One `ConversationState` exists per active training ticket. It counts
//! processed turns, how long the trainee has been stuck on the same
//! evaluation, and how many hints were actually delivered.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StateMachine, TicketId};

use super::errors::SimulationError;
use super::evaluation::Evaluation;
use super::hint_policy::{HintDecision, HintDecisionEngine, HintPolicyConfig};
use super::lifecycle::LifecycleState;

/// Mutable conversation record for a single ticket.
///
/// Invariants:
/// - `stuck_counter` is 1 right after the evaluation changes, otherwise it
///   counts consecutive repeats of the current evaluation
/// - `lifecycle` becomes `Resolved` exactly once, on `Evaluation::Solved`
/// - a resolved conversation rejects further transitions unchanged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationState {
    ticket_id: TicketId,
    current_evaluation: Option<Evaluation>,
    lifecycle: LifecycleState,
    turn_count: u32,
    stuck_counter: u32,
    hints_given: u32,
    last_hint_turn: Option<u32>,
}

impl ConversationState {
    /// Creates a fresh, active conversation with every counter at zero.
    pub fn new(ticket_id: TicketId) -> Self {
        Self {
            ticket_id,
            current_evaluation: None,
            lifecycle: LifecycleState::Active,
            turn_count: 0,
            stuck_counter: 0,
            hints_given: 0,
            last_hint_turn: None,
        }
    }

    /// Records one processed turn with its evaluation.
    ///
    /// Returns the lifecycle state after the turn. When it is `Resolved` the
    /// caller must drop the conversation from its registry.
    ///
    /// # Errors
    ///
    /// `SimulationError::ConversationResolved` if the conversation already
    /// reached SOLVED. No field is modified in that case.
    pub fn transition(&mut self, evaluation: Evaluation) -> Result<LifecycleState, SimulationError> {
        if self.lifecycle.is_terminal() {
            return Err(SimulationError::ConversationResolved(self.ticket_id));
        }

        self.turn_count = self.turn_count.saturating_add(1);

        let repeated = self.current_evaluation == Some(evaluation) && !evaluation.is_terminal();
        self.stuck_counter = if repeated {
            self.stuck_counter.saturating_add(1)
        } else {
            1
        };

        self.current_evaluation = Some(evaluation);

        if evaluation.is_terminal() {
            self.lifecycle = LifecycleState::Resolved;
        }

        Ok(self.lifecycle)
    }

    /// Evaluates the hint policy against the current state. Pure.
    pub fn should_provide_hint(&self, policy: &HintPolicyConfig) -> HintDecision {
        HintDecisionEngine::new(*policy).decide(self)
    }

    /// Records that a hint was actually surfaced to the trainee.
    ///
    /// Call only after an affirmative `should_provide_hint` AND the
    /// generator's confirmation that the hint appeared in its reply.
    pub fn record_hint_given(&mut self) {
        self.hints_given = self.hints_given.saturating_add(1);
        self.last_hint_turn = Some(self.turn_count);
    }

    /// Get the ticket this conversation belongs to
    pub fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }

    /// Get the lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.lifecycle
    }

    /// Get the evaluation of the most recent turn
    pub fn current_evaluation(&self) -> Option<Evaluation> {
        self.current_evaluation
    }

    /// Get the number of processed turns
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Get the consecutive-repeat counter for the current evaluation
    pub fn stuck_counter(&self) -> u32 {
        self.stuck_counter
    }

    /// Get the number of hints delivered
    pub fn hints_given(&self) -> u32 {
        self.hints_given
    }

    /// Get the turn at which the last hint was delivered
    pub fn last_hint_turn(&self) -> Option<u32> {
        self.last_hint_turn
    }

    /// Returns true once the conversation reached SOLVED.
    pub fn is_resolved(&self) -> bool {
        self.lifecycle == LifecycleState::Resolved
    }

    /// Export the observable fields for audit trails.
    pub fn snapshot(&self) -> ConversationSnapshot {
        ConversationSnapshot {
            ticket_id: self.ticket_id,
            lifecycle_state: self.lifecycle,
            current_evaluation: self.current_evaluation,
            turn_count: self.turn_count,
            stuck_counter: self.stuck_counter,
            hints_given: self.hints_given,
            last_hint_turn: self.last_hint_turn,
        }
    }
}

/// Serializable view of a conversation, attached to stored reasoning trails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSnapshot {
    pub ticket_id: TicketId,
    pub lifecycle_state: LifecycleState,
    pub current_evaluation: Option<Evaluation>,
    pub turn_count: u32,
    pub stuck_counter: u32,
    pub hints_given: u32,
    pub last_hint_turn: Option<u32>,
}
