//! HTTP adapters - REST API implementations.

pub mod simulation;

pub use simulation::{routes as simulation_routes, SimulationAppState};
