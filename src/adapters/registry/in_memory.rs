//! In-Memory Conversation Registry
//!
//! Holds one conversation per active ticket for the lifetime of the process.
//! Each entry remembers when it was last used so abandoned conversations can
//! be evicted.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::{Timestamp, TicketId};
use crate::domain::simulation::ConversationState;
use crate::ports::{ConversationRegistry, SharedConversation};

/// In-memory registry of live conversations
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationRegistry {
    entries: Arc<RwLock<HashMap<TicketId, RegistryEntry>>>,
}

#[derive(Debug)]
struct RegistryEntry {
    conversation: SharedConversation,
    last_active: Timestamp,
}

impl InMemoryConversationRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides an entry's last activity (useful for tests)
    pub async fn set_last_active(&self, ticket_id: TicketId, at: Timestamp) {
        if let Some(entry) = self.entries.write().await.get_mut(&ticket_id) {
            entry.last_active = at;
        }
    }
}

#[async_trait]
impl ConversationRegistry for InMemoryConversationRegistry {
    async fn get_or_create(&self, ticket_id: TicketId) -> SharedConversation {
        let now = Timestamp::now();
        let mut entries = self.entries.write().await;

        let entry = entries.entry(ticket_id).or_insert_with(|| {
            tracing::debug!(ticket_id = %ticket_id, "Starting simulated conversation");
            RegistryEntry {
                conversation: Arc::new(Mutex::new(ConversationState::new(ticket_id))),
                last_active: now,
            }
        });
        entry.last_active = now;

        Arc::clone(&entry.conversation)
    }

    async fn find(&self, ticket_id: TicketId) -> Option<SharedConversation> {
        self.entries
            .read()
            .await
            .get(&ticket_id)
            .map(|entry| Arc::clone(&entry.conversation))
    }

    async fn remove(&self, ticket_id: TicketId) {
        let Some(conversation) = self.find(ticket_id).await else {
            return;
        };

        // Let an in-flight turn finish recording before the state goes away.
        let _turn = conversation.lock().await;
        let mut entries = self.entries.write().await;
        let still_current = entries
            .get(&ticket_id)
            .is_some_and(|entry| Arc::ptr_eq(&entry.conversation, &conversation));
        if still_current {
            entries.remove(&ticket_id);
            tracing::debug!(ticket_id = %ticket_id, "Dropped simulated conversation");
        }
    }

    async fn evict_idle(&self, cutoff: Timestamp) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();

        entries.retain(|ticket_id, entry| {
            let idle = entry.last_active.is_before(&cutoff);
            // A held lock means a turn is in flight.
            let busy = entry.conversation.try_lock().is_err();
            let evict = idle && !busy;
            if evict {
                tracing::debug!(ticket_id = %ticket_id, "Evicting idle simulated conversation");
            }
            !evict
        });

        before - entries.len()
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
