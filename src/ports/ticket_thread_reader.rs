//! Ticket Thread Reader Port - Read access to the ticket being simulated.
//!
//! Tickets and comments are persisted by the surrounding helpdesk. The
//! simulation only reads the context and prior comments it needs to prompt
//! the persona.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::TicketId;

/// Errors that can occur while loading a ticket thread
#[derive(Debug, thiserror::Error)]
pub enum ThreadReadError {
    #[error("Ticket not found: {0}")]
    NotFound(TicketId),

    #[error("Ticket store unavailable: {0}")]
    Unavailable(String),
}

/// Port for loading a simulated ticket and its comment history
#[async_trait]
pub trait TicketThreadReader: Send + Sync {
    /// Load the ticket context and every comment posted so far
    ///
    /// # Errors
    /// Returns `ThreadReadError::NotFound` if the ticket does not exist
    async fn load_thread(&self, ticket_id: TicketId) -> Result<TicketThread, ThreadReadError>;
}

/// A ticket plus its comments, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketThread {
    pub context: TicketContext,
    #[serde(default)]
    pub comments: Vec<ThreadComment>,
}

/// What the simulated end user reported, and what actually fixes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketContext {
    pub subject: String,
    pub description: String,
    pub persona: PersonaProfile,
    /// Hidden from the trainee; used to judge closeness and shape hints.
    #[serde(default)]
    pub expected_resolution: Option<String>,
}

/// The simulated end user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaProfile {
    pub name: String,
    /// Free-form personality and technical background.
    #[serde(default)]
    pub description: String,
}

/// One comment on the ticket thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadComment {
    pub author: CommentAuthor,
    pub body: String,
}

impl ThreadComment {
    /// Creates a comment from the trainee support agent.
    pub fn support(body: impl Into<String>) -> Self {
        Self {
            author: CommentAuthor::Support,
            body: body.into(),
        }
    }

    /// Creates a comment from the simulated end user.
    pub fn customer(body: impl Into<String>) -> Self {
        Self {
            author: CommentAuthor::Customer,
            body: body.into(),
        }
    }
}

/// Who wrote a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentAuthor {
    /// The trainee support agent.
    Support,
    /// The simulated end user.
    Customer,
}
