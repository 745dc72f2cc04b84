//! HTTP handlers for simulation endpoints
//!
//! These handlers connect Axum routes to the application layer handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::tickets::InMemoryTicketThreads;
use crate::application::handlers::{
    EndSimulationCommand, EndSimulationHandler, GetSimulationStateError,
    GetSimulationStateHandler, GetSimulationStateQuery, ProcessTurnCommand, ProcessTurnError,
    ProcessTurnHandler,
};
use crate::domain::foundation::{ErrorCode, TicketId};
use crate::domain::simulation::HintPolicyConfig;
use crate::ports::{ConversationRegistry, PersonaResponder, ThreadReadError, TicketThread};

use super::dto::{EndSimulationResponse, ErrorResponse, SubmitTurnRequest, TurnResponse};

type ApiError = (StatusCode, Json<ErrorResponse>);

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct SimulationAppState {
    pub registry: Arc<dyn ConversationRegistry>,
    pub threads: Arc<InMemoryTicketThreads>,
    pub responder: Arc<dyn PersonaResponder>,
    /// Hint policy validated at startup
    pub policy: HintPolicyConfig,
}

impl SimulationAppState {
    pub fn new(
        registry: Arc<dyn ConversationRegistry>,
        threads: Arc<InMemoryTicketThreads>,
        responder: Arc<dyn PersonaResponder>,
        policy: HintPolicyConfig,
    ) -> Self {
        Self {
            registry,
            threads,
            responder,
            policy,
        }
    }

    pub fn process_turn_handler(&self) -> ProcessTurnHandler {
        ProcessTurnHandler::new(
            self.registry.clone(),
            self.threads.clone(),
            self.responder.clone(),
        )
    }

    pub fn get_simulation_state_handler(&self) -> GetSimulationStateHandler {
        GetSimulationStateHandler::new(self.registry.clone())
    }

    pub fn end_simulation_handler(&self) -> EndSimulationHandler {
        EndSimulationHandler::new(self.registry.clone())
    }
}

fn parse_ticket_id(raw: &str) -> Result<TicketId, ApiError> {
    TicketId::from_str(raw).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::invalid_ticket_id(raw)),
        )
    })
}

fn turn_error(err: ProcessTurnError) -> ApiError {
    let (status, code) = match &err {
        ProcessTurnError::EmptyComment => (StatusCode::BAD_REQUEST, ErrorCode::EmptyComment),
        ProcessTurnError::ConversationResolved(_) => {
            (StatusCode::CONFLICT, ErrorCode::ConversationResolved)
        }
        ProcessTurnError::Thread(ThreadReadError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, ErrorCode::TicketNotFound)
        }
        ProcessTurnError::Thread(ThreadReadError::Unavailable(_)) => {
            (StatusCode::SERVICE_UNAVAILABLE, ErrorCode::InternalError)
        }
        ProcessTurnError::Generator(_) => (StatusCode::BAD_GATEWAY, ErrorCode::AIProviderError),
        ProcessTurnError::Classifier(_) => (StatusCode::BAD_GATEWAY, ErrorCode::ClassifierFault),
    };

    (status, Json(ErrorResponse::new(code, err.to_string())))
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// Process a support comment on a simulated ticket
///
/// POST /simulations/tickets/{ticket_id}/turns
pub async fn submit_turn(
    State(app_state): State<SimulationAppState>,
    Path(ticket_id): Path<String>,
    Json(req): Json<SubmitTurnRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket_id = parse_ticket_id(&ticket_id)?;

    let cmd = ProcessTurnCommand {
        ticket_id,
        support_comment: req.comment,
        policy: app_state.policy,
    };

    let result = app_state
        .process_turn_handler()
        .handle(cmd)
        .await
        .map_err(turn_error)?;

    Ok((StatusCode::OK, Json(TurnResponse::from(result))))
}

/// Get the live conversation snapshot
///
/// GET /simulations/tickets/{ticket_id}
pub async fn get_simulation_state(
    State(app_state): State<SimulationAppState>,
    Path(ticket_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket_id = parse_ticket_id(&ticket_id)?;

    let snapshot = app_state
        .get_simulation_state_handler()
        .handle(GetSimulationStateQuery { ticket_id })
        .await
        .map_err(|e| match e {
            GetSimulationStateError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(
                    ErrorCode::ConversationNotFound,
                    e.to_string(),
                )),
            ),
        })?;

    Ok((StatusCode::OK, Json(snapshot)))
}

/// Abandon a simulated conversation
///
/// DELETE /simulations/tickets/{ticket_id}
pub async fn end_simulation(
    State(app_state): State<SimulationAppState>,
    Path(ticket_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket_id = parse_ticket_id(&ticket_id)?;

    let result = app_state
        .end_simulation_handler()
        .handle(EndSimulationCommand { ticket_id })
        .await;

    let message = if result.removed {
        format!("Simulation for ticket {} ended", ticket_id)
    } else {
        format!("No active simulation for ticket {}", ticket_id)
    };

    Ok((
        StatusCode::OK,
        Json(EndSimulationResponse {
            removed: result.removed,
            message,
        }),
    ))
}

/// Register the ticket context and comment thread
///
/// PUT /simulations/tickets/{ticket_id}/thread
pub async fn seed_ticket_thread(
    State(app_state): State<SimulationAppState>,
    Path(ticket_id): Path<String>,
    Json(thread): Json<TicketThread>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket_id = parse_ticket_id(&ticket_id)?;

    app_state.threads.put(ticket_id, thread).await;
    tracing::debug!(ticket_id = %ticket_id, "Ticket thread stored");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::simulation::routes;
    use crate::adapters::persona::MockPersonaResponder;
    use crate::adapters::registry::InMemoryConversationRegistry;
    use crate::domain::simulation::{Evaluation, LifecycleState};
    use crate::ports::{AIError, PersonaProfile, PersonaReply, ThreadComment, TicketContext};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn sample_thread() -> TicketThread {
        TicketThread {
            context: TicketContext {
                subject: "Printer offline".to_string(),
                description: "The 3rd floor printer shows offline".to_string(),
                persona: PersonaProfile {
                    name: "Lee".to_string(),
                    description: "Office manager".to_string(),
                },
                expected_resolution: Some("Re-add the printer by IP".to_string()),
            },
            comments: vec![ThreadComment::customer("It just says offline")],
        }
    }

    fn test_app_state(responder: MockPersonaResponder) -> SimulationAppState {
        SimulationAppState::new(
            Arc::new(InMemoryConversationRegistry::new()),
            Arc::new(InMemoryTicketThreads::new()),
            Arc::new(responder),
            HintPolicyConfig::default(),
        )
    }

    async fn seeded_state(responder: MockPersonaResponder) -> (SimulationAppState, TicketId) {
        let app_state = test_app_state(responder);
        let ticket_id = TicketId::new();
        app_state.threads.put(ticket_id, sample_thread()).await;
        (app_state, ticket_id)
    }

    fn turn(comment: &str) -> Json<SubmitTurnRequest> {
        Json(SubmitTurnRequest {
            comment: comment.to_string(),
        })
    }

    mod submit_turn {
        use super::*;

        #[tokio::test]
        async fn returns_reply_and_debug_state() {
            let (app_state, ticket_id) = seeded_state(
                MockPersonaResponder::new()
                    .with_reply(PersonaReply::new("Still nothing.", "PROGRESSING")),
            )
            .await;

            let result = submit_turn(
                State(app_state),
                Path(ticket_id.to_string()),
                turn("Check the cable"),
            )
            .await;

            assert!(result.is_ok());
        }

        #[tokio::test]
        async fn invalid_ticket_id_is_bad_request() {
            let app_state = test_app_state(MockPersonaResponder::new());

            let result = submit_turn(State(app_state), Path("nope".to_string()), turn("hi")).await;

            let (status, Json(body)) = result.err().unwrap();
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body.code, "VALIDATION_FAILED");
        }

        #[tokio::test]
        async fn empty_comment_is_bad_request() {
            let (app_state, ticket_id) = seeded_state(MockPersonaResponder::new()).await;

            let result = submit_turn(State(app_state), Path(ticket_id.to_string()), turn("  ")).await;

            let (status, Json(body)) = result.err().unwrap();
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body.code, "EMPTY_COMMENT");
        }

        #[tokio::test]
        async fn unknown_thread_is_not_found() {
            let app_state = test_app_state(MockPersonaResponder::new().with_evaluation("EARLY"));

            let result = submit_turn(
                State(app_state),
                Path(TicketId::new().to_string()),
                turn("hi"),
            )
            .await;

            let (status, Json(body)) = result.err().unwrap();
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body.code, "TICKET_NOT_FOUND");
        }

        #[tokio::test]
        async fn classifier_fault_is_bad_gateway() {
            let (app_state, ticket_id) =
                seeded_state(MockPersonaResponder::new().with_evaluation("DONE-ISH")).await;

            let result = submit_turn(State(app_state), Path(ticket_id.to_string()), turn("hi")).await;

            let (status, Json(body)) = result.err().unwrap();
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(body.code, "CLASSIFIER_FAULT");
        }

        #[tokio::test]
        async fn generator_error_is_bad_gateway() {
            let (app_state, ticket_id) = seeded_state(
                MockPersonaResponder::new().with_error(AIError::Timeout { timeout_secs: 60 }),
            )
            .await;

            let result = submit_turn(State(app_state), Path(ticket_id.to_string()), turn("hi")).await;

            let (status, Json(body)) = result.err().unwrap();
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(body.code, "AI_PROVIDER_ERROR");
        }
    }

    mod get_and_end {
        use super::*;

        #[tokio::test]
        async fn unknown_conversation_is_not_found() {
            let app_state = test_app_state(MockPersonaResponder::new());

            let result =
                get_simulation_state(State(app_state), Path(TicketId::new().to_string())).await;

            let (status, Json(body)) = result.err().unwrap();
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body.code, "CONVERSATION_NOT_FOUND");
        }

        #[tokio::test]
        async fn end_removes_conversation() {
            let app_state = test_app_state(MockPersonaResponder::new());
            let ticket_id = TicketId::new();
            app_state.registry.get_or_create(ticket_id).await;

            let result = end_simulation(State(app_state.clone()), Path(ticket_id.to_string())).await;

            assert!(result.is_ok());
            assert!(app_state.registry.find(ticket_id).await.is_none());
        }
    }

    mod router {
        use super::*;

        async fn send(
            app_state: &SimulationAppState,
            method: &str,
            uri: String,
            body: Option<String>,
        ) -> (StatusCode, Vec<u8>) {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body.map(Body::from).unwrap_or_else(Body::empty))
                .unwrap();

            let response = routes()
                .with_state(app_state.clone())
                .oneshot(request)
                .await
                .unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, bytes.to_vec())
        }

        #[tokio::test]
        async fn seed_turn_inspect_and_solve() {
            let app_state = test_app_state(
                MockPersonaResponder::new()
                    .with_evaluation("EARLY")
                    .with_evaluation("SOLVED"),
            );
            let ticket_id = TicketId::new();
            let base = format!("/simulations/tickets/{}", ticket_id);

            let (status, _) = send(
                &app_state,
                "PUT",
                format!("{}/thread", base),
                Some(serde_json::to_string(&sample_thread()).unwrap()),
            )
            .await;
            assert_eq!(status, StatusCode::NO_CONTENT);

            let (status, body) = send(
                &app_state,
                "POST",
                format!("{}/turns", base),
                Some(r#"{"comment":"Did you restart?"}"#.to_string()),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            let turn: TurnResponse = serde_json::from_slice(&body).unwrap();
            assert_eq!(turn.evaluation, Evaluation::Early);
            assert_eq!(turn.debug_state.turn_count, 1);

            let (status, body) = send(&app_state, "GET", base.clone(), None).await;
            assert_eq!(status, StatusCode::OK);
            let snapshot: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(snapshot["lifecycle_state"], "ACTIVE");
            assert_eq!(snapshot["current_evaluation"], "EARLY");

            let (status, body) = send(
                &app_state,
                "POST",
                format!("{}/turns", base),
                Some(r#"{"comment":"Re-add the printer by IP"}"#.to_string()),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            let turn: TurnResponse = serde_json::from_slice(&body).unwrap();
            assert_eq!(turn.debug_state.lifecycle_state, LifecycleState::Resolved);

            let (status, _) = send(&app_state, "GET", base, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        #[tokio::test]
        async fn delete_is_idempotent() {
            let app_state = test_app_state(MockPersonaResponder::new());
            let uri = format!("/simulations/tickets/{}", TicketId::new());

            let (status, body) = send(&app_state, "DELETE", uri, None).await;

            assert_eq!(status, StatusCode::OK);
            let body: EndSimulationResponse = serde_json::from_slice(&body).unwrap();
            assert!(!body.removed);
        }
    }
}
