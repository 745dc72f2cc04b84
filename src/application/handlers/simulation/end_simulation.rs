//! EndSimulationHandler - Abandon a simulated conversation

use std::sync::Arc;

use crate::domain::foundation::TicketId;
use crate::ports::ConversationRegistry;

#[derive(Debug, Clone)]
pub struct EndSimulationCommand {
    pub ticket_id: TicketId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndSimulationResult {
    /// False if there was no live conversation to drop.
    pub removed: bool,
}

/// Drops a ticket's conversation so the next turn starts fresh
pub struct EndSimulationHandler {
    registry: Arc<dyn ConversationRegistry>,
}

impl EndSimulationHandler {
    pub fn new(registry: Arc<dyn ConversationRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, cmd: EndSimulationCommand) -> EndSimulationResult {
        let removed = self.registry.find(cmd.ticket_id).await.is_some();
        self.registry.remove(cmd.ticket_id).await;

        tracing::info!(ticket_id = %cmd.ticket_id, removed, "Simulation ended");

        EndSimulationResult { removed }
    }
}
