//! Simulation domain module.
//!
//! Tracks, per training ticket, how close a trainee support agent is getting
//! to the correct resolution and decides when the simulated end user should
//! be nudged with a hint.
//!
//! # Architecture
//!
//! - **ConversationState**: per-ticket counters and lifecycle, mutated once per turn
//! - **HintDecisionEngine**: pure policy evaluation over a conversation
//! - **classify_reply**: strict parsing of the generator's evaluation label
//!
//! # Example
//!
//! ```ignore
//! let mut conversation = ConversationState::new(ticket_id);
//! let decision = conversation.should_provide_hint(&policy);
//! // ... generator call ...
//! conversation.transition(classify_reply(reply.evaluation.as_deref())?)?;
//! if decision.should_hint && reply.hint_given {
//!     conversation.record_hint_given();
//! }
//! ```

mod conversation;
mod errors;
mod evaluation;
mod hint_policy;
mod lifecycle;

pub use conversation::{ConversationSnapshot, ConversationState};
pub use errors::{ClassifierFault, SimulationError};
pub use evaluation::{classify_reply, Evaluation, HintTrigger};
pub use hint_policy::{
    HintDecision, HintDecisionEngine, HintInstruction, HintPolicyConfig, SuppressionReason,
};
pub use lifecycle::LifecycleState;
