//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machines)
//! - `simulation` - Conversation state machine and hint decision engine

pub mod foundation;
pub mod simulation;
