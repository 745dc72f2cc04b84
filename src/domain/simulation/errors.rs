//! Error types for the simulation domain

use crate::domain::foundation::TicketId;

/// Conversation state machine errors
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("Conversation for ticket {0} is already resolved")]
    ConversationResolved(TicketId),
}

/// The generator broke its classification contract.
///
/// Never coerced into a default label: the turn is dropped so the caller can
/// retry on the next inbound comment.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ClassifierFault {
    #[error("Generator reply is missing an evaluation label")]
    MissingEvaluation,

    #[error("Generator returned unknown evaluation label: {0:?}")]
    UnknownEvaluation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_resolved_names_ticket() {
        let ticket_id = TicketId::new();
        let err = SimulationError::ConversationResolved(ticket_id);

        assert!(err.to_string().contains(&ticket_id.to_string()));
    }

    #[test]
    fn test_unknown_evaluation_quotes_label() {
        let err = ClassifierFault::UnknownEvaluation("ALMOST".to_string());

        assert_eq!(
            err.to_string(),
            "Generator returned unknown evaluation label: \"ALMOST\""
        );
    }
}
