//! In-memory ticket thread store.
//!
//! Stands in for the helpdesk's ticket database. Threads are registered with
//! `put` and comments appended with `append_comment`.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::TicketId;
use crate::ports::{ThreadComment, ThreadReadError, TicketThread, TicketThreadReader};

#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketThreads {
    threads: Arc<RwLock<HashMap<TicketId, TicketThread>>>,
}

impl InMemoryTicketThreads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or replaces) a ticket thread.
    pub async fn put(&self, ticket_id: TicketId, thread: TicketThread) {
        self.threads.write().await.insert(ticket_id, thread);
    }

    /// Appends a comment to an existing thread.
    ///
    /// # Errors
    /// `ThreadReadError::NotFound` if the ticket was never stored
    pub async fn append_comment(
        &self,
        ticket_id: TicketId,
        comment: ThreadComment,
    ) -> Result<(), ThreadReadError> {
        let mut threads = self.threads.write().await;
        let thread = threads
            .get_mut(&ticket_id)
            .ok_or(ThreadReadError::NotFound(ticket_id))?;
        thread.comments.push(comment);
        Ok(())
    }

    /// Number of stored threads.
    pub async fn len(&self) -> usize {
        self.threads.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TicketThreadReader for InMemoryTicketThreads {
    async fn load_thread(&self, ticket_id: TicketId) -> Result<TicketThread, ThreadReadError> {
        self.threads
            .read()
            .await
            .get(&ticket_id)
            .cloned()
            .ok_or(ThreadReadError::NotFound(ticket_id))
    }
}
