//! Request and response bodies for simulation endpoints

use serde::{Deserialize, Serialize};

use crate::application::handlers::ProcessTurnResult;
use crate::domain::foundation::ErrorCode;
use crate::domain::simulation::{ConversationSnapshot, Evaluation};

/// Body of `POST /simulations/tickets/:ticket_id/turns`
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitTurnRequest {
    pub comment: String,
}

/// Outcome of one simulated turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResponse {
    pub response: String,
    pub evaluation: Evaluation,
    pub hint_given: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotional_state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    pub debug_state: ConversationSnapshot,
}

impl From<ProcessTurnResult> for TurnResponse {
    fn from(result: ProcessTurnResult) -> Self {
        Self {
            response: result.response,
            evaluation: result.evaluation,
            hint_given: result.hint_given,
            emotional_state: result.emotional_state,
            reasoning: result.reasoning,
            debug_state: result.debug_state,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndSimulationResponse {
    pub removed: bool,
    pub message: String,
}

/// Error body shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn invalid_ticket_id(raw: &str) -> Self {
        Self::new(
            ErrorCode::ValidationFailed,
            format!("Invalid ticket_id format: {}", raw),
        )
    }
}
