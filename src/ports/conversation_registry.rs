//! Conversation Registry Port - Live conversation state per ticket.
//!
//! The registry is an explicitly constructed, injected store. Entries are
//! created lazily on a ticket's first turn and dropped when the conversation
//! resolves or sits idle too long. Nothing survives a process restart.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::foundation::{Timestamp, TicketId};
use crate::domain::simulation::ConversationState;

/// Handle to one ticket's conversation.
///
/// The mutex is the per-ticket critical section: hold it across the whole
/// decide → generate → transition sequence so duplicate or retried requests
/// for the same ticket cannot interleave.
pub type SharedConversation = Arc<Mutex<ConversationState>>;

/// Port for the in-process conversation registry
#[async_trait]
pub trait ConversationRegistry: Send + Sync {
    /// Returns the ticket's conversation, creating a fresh active one if absent.
    ///
    /// Never fails: an unknown ticket simply starts a new conversation.
    async fn get_or_create(&self, ticket_id: TicketId) -> SharedConversation;

    /// Returns the ticket's conversation without creating one.
    async fn find(&self, ticket_id: TicketId) -> Option<SharedConversation>;

    /// Drops the ticket's conversation. No-op if absent.
    ///
    /// Waits for a turn in flight to finish first, so callers must not hold
    /// the conversation's lock.
    async fn remove(&self, ticket_id: TicketId);

    /// Drops every conversation idle since before `cutoff`.
    ///
    /// Conversations with a turn in flight are kept.
    ///
    /// # Returns
    /// The number of evicted conversations
    async fn evict_idle(&self, cutoff: Timestamp) -> usize;

    /// Number of live conversations
    async fn len(&self) -> usize;

    /// Returns true if no conversation is live
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
