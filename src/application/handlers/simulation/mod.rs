//! Simulation command and query handlers.

mod end_simulation;
mod get_simulation_state;
mod process_turn;

pub use end_simulation::{EndSimulationCommand, EndSimulationHandler, EndSimulationResult};
pub use get_simulation_state::{
    GetSimulationStateError, GetSimulationStateHandler, GetSimulationStateQuery,
};
pub use process_turn::{
    ProcessTurnCommand, ProcessTurnError, ProcessTurnHandler, ProcessTurnResult,
};
