//! Route definitions for simulation endpoints

use axum::routing::{get, post, put};
use axum::Router;

use super::handlers::{
    end_simulation, get_simulation_state, seed_ticket_thread, submit_turn, SimulationAppState,
};

/// Create the simulation router
///
/// # Endpoints
///
/// - `POST /simulations/tickets/:ticket_id/turns` - Process a support comment
/// - `GET /simulations/tickets/:ticket_id` - Get conversation snapshot
/// - `DELETE /simulations/tickets/:ticket_id` - Abandon the conversation
/// - `PUT /simulations/tickets/:ticket_id/thread` - Register ticket context and comments
pub fn routes() -> Router<SimulationAppState> {
    Router::new()
        .route("/simulations/tickets/:ticket_id/turns", post(submit_turn))
        .route(
            "/simulations/tickets/:ticket_id",
            get(get_simulation_state).delete(end_simulation),
        )
        .route("/simulations/tickets/:ticket_id/thread", put(seed_ticket_thread))
}
