//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Generative model providers (Anthropic, mock)
//! - `http` - Axum REST endpoints
//! - `persona` - Persona responders built on an AI provider
//! - `registry` - Live conversation registry and idle eviction
//! - `tickets` - Ticket thread storage

pub mod ai;
pub mod http;
pub mod persona;
pub mod registry;
pub mod tickets;

pub use ai::{AnthropicConfig, AnthropicProvider, MockAIProvider};
pub use persona::{LlmPersonaResponder, LlmPersonaResponderConfig, MockPersonaResponder};
pub use registry::{IdleEvictor, IdleEvictorConfig, InMemoryConversationRegistry};
pub use tickets::InMemoryTicketThreads;
