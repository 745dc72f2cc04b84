//! Persona Responder Adapters.
//!
//! - `LlmPersonaResponder` - Plays the end user through any `AIProvider`
//! - `MockPersonaResponder` - Scripted replies for testing

mod llm_responder;
mod mock_responder;
mod reply_parser;

pub use llm_responder::{LlmPersonaResponder, LlmPersonaResponderConfig};
pub use mock_responder::MockPersonaResponder;
pub use reply_parser::parse_persona_reply;
