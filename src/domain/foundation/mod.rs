//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the lifecycle state machine trait,
//! and error types that form the vocabulary of the simulation domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::TicketId;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
