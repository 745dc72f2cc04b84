//! GetSimulationStateHandler - Read the live state of a simulated ticket

use std::sync::Arc;

use crate::domain::foundation::TicketId;
use crate::domain::simulation::ConversationSnapshot;
use crate::ports::ConversationRegistry;

/// Query for a ticket's conversation snapshot
#[derive(Debug, Clone)]
pub struct GetSimulationStateQuery {
    pub ticket_id: TicketId,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GetSimulationStateError {
    /// No live conversation (never started, solved, ended or evicted)
    #[error("No active simulation for ticket: {0}")]
    NotFound(TicketId),
}

/// Handler for reading conversation state
///
/// Unlike turn processing this never creates a conversation.
pub struct GetSimulationStateHandler {
    registry: Arc<dyn ConversationRegistry>,
}

impl GetSimulationStateHandler {
    pub fn new(registry: Arc<dyn ConversationRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(
        &self,
        query: GetSimulationStateQuery,
    ) -> Result<ConversationSnapshot, GetSimulationStateError> {
        let conversation = self
            .registry
            .find(query.ticket_id)
            .await
            .ok_or(GetSimulationStateError::NotFound(query.ticket_id))?;

        let snapshot = conversation.lock().await.snapshot();
        Ok(snapshot)
    }
}
