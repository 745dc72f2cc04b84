//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the simulation domain and the outside world. Adapters implement these ports.
//!
//! - `ConversationRegistry` - Live per-ticket conversation state
//! - `PersonaResponder` - Generates the simulated end user's replies
//! - `TicketThreadReader` - Read access to ticket context and comments
//! - `AIProvider` - Generative model backend

mod ai_provider;
mod conversation_registry;
mod persona_responder;
mod ticket_thread_reader;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use conversation_registry::{ConversationRegistry, SharedConversation};
pub use persona_responder::{PersonaReply, PersonaRequest, PersonaResponder};
pub use ticket_thread_reader::{
    CommentAuthor, PersonaProfile, ThreadComment, ThreadReadError, TicketContext, TicketThread,
    TicketThreadReader,
};
