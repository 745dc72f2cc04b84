//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod simulation;

pub use simulation::{
    EndSimulationCommand, EndSimulationHandler, EndSimulationResult, GetSimulationStateError,
    GetSimulationStateHandler, GetSimulationStateQuery, ProcessTurnCommand, ProcessTurnError,
    ProcessTurnHandler, ProcessTurnResult,
};
