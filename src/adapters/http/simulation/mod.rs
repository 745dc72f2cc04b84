//! HTTP adapters for simulated tickets
//!
//! Exposes the turn pipeline and conversation inspection over REST.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::SimulationAppState;
pub use routes::routes;
