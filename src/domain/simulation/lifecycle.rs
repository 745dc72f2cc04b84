//! Conversation lifecycle.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// The lifecycle state of a simulated conversation.
///
/// - `Active`: the trainee is still working the ticket
/// - `Resolved`: the ticket was solved; the conversation is closed for good
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    #[default]
    Active,
    Resolved,
}

impl LifecycleState {
    /// Returns true if the conversation still accepts turns.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl StateMachine for LifecycleState {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (Self::Active, Self::Resolved))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Active => vec![Self::Resolved],
            Self::Resolved => vec![],
        }
    }
}
