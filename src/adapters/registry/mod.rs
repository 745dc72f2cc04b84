//! Conversation registry adapters.
//!
//! - `InMemoryConversationRegistry` - Process-local registry keyed by ticket
//! - `IdleEvictor` - Background sweep that drops abandoned conversations

mod idle_evictor;
mod in_memory;

pub use idle_evictor::{IdleEvictor, IdleEvictorConfig};
pub use in_memory::InMemoryConversationRegistry;
