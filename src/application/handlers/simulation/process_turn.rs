//! ProcessTurnHandler - Run one support turn on a simulated ticket
//!
//! The whole decide → narrate → classify → transition sequence runs while
//! holding the ticket's conversation lock, so duplicate or retried comments
//! for the same ticket are serialized instead of interleaving their
//! read-then-write steps. Nothing is mutated until the generator reply has
//! been classified; a failed turn leaves the conversation exactly as it was.

use std::sync::Arc;

use crate::domain::foundation::TicketId;
use crate::domain::simulation::{
    classify_reply, ClassifierFault, ConversationSnapshot, Evaluation, HintDecisionEngine,
    HintPolicyConfig, LifecycleState, SimulationError,
};
use crate::ports::{
    AIError, CommentAuthor, ConversationRegistry, PersonaRequest, PersonaResponder,
    ThreadReadError, TicketThreadReader,
};

/// Command to process one inbound support comment
#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    pub ticket_id: TicketId,
    pub support_comment: String,
    /// Pre-validated policy for this turn.
    pub policy: HintPolicyConfig,
}

/// Outcome of a processed turn
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessTurnResult {
    /// The simulated end user's reply.
    pub response: String,
    pub evaluation: Evaluation,
    /// True only if a hint was both requested and delivered.
    pub hint_given: bool,
    pub emotional_state: Option<String>,
    pub reasoning: Option<String>,
    /// Conversation state after the turn, for audit trails.
    pub debug_state: ConversationSnapshot,
}

/// Error type for processing a turn
#[derive(Debug, thiserror::Error)]
pub enum ProcessTurnError {
    #[error("Support comment cannot be empty")]
    EmptyComment,

    #[error("Simulation for ticket {0} is already resolved")]
    ConversationResolved(TicketId),

    #[error(transparent)]
    Thread(#[from] ThreadReadError),

    #[error("Persona generator failed: {0}")]
    Generator(#[from] AIError),

    #[error("Persona classification failed: {0}")]
    Classifier(#[from] ClassifierFault),
}

impl From<SimulationError> for ProcessTurnError {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::ConversationResolved(ticket_id) => {
                ProcessTurnError::ConversationResolved(ticket_id)
            }
        }
    }
}

/// Handler for simulated support turns
pub struct ProcessTurnHandler {
    registry: Arc<dyn ConversationRegistry>,
    threads: Arc<dyn TicketThreadReader>,
    responder: Arc<dyn PersonaResponder>,
}

impl ProcessTurnHandler {
    pub fn new(
        registry: Arc<dyn ConversationRegistry>,
        threads: Arc<dyn TicketThreadReader>,
        responder: Arc<dyn PersonaResponder>,
    ) -> Self {
        Self {
            registry,
            threads,
            responder,
        }
    }

    pub async fn handle(
        &self,
        cmd: ProcessTurnCommand,
    ) -> Result<ProcessTurnResult, ProcessTurnError> {
        let ticket_id = cmd.ticket_id;
        let support_comment = cmd.support_comment.trim();
        if support_comment.is_empty() {
            return Err(ProcessTurnError::EmptyComment);
        }

        let mut state = loop {
            let conversation = self.registry.get_or_create(ticket_id).await;
            let state = Arc::clone(&conversation).lock_owned().await;

            // A concurrent turn may have solved the ticket while we waited.
            if state.is_resolved() {
                return Err(ProcessTurnError::ConversationResolved(ticket_id));
            }

            // Or the simulation was ended while we waited; start over on a fresh one.
            let current = self.registry.find(ticket_id).await;
            if current.is_some_and(|current| Arc::ptr_eq(&current, &conversation)) {
                break state;
            }
            tracing::debug!(ticket_id = %ticket_id, "Conversation ended while queued, retrying");
        };

        let decision = HintDecisionEngine::new(cmd.policy).decide(&state);
        let hint = decision.instruction(&state);

        tracing::debug!(
            ticket_id = %ticket_id,
            turn_count = state.turn_count(),
            stuck_counter = state.stuck_counter(),
            should_hint = decision.should_hint,
            trigger = ?decision.trigger,
            suppressed = ?decision.suppressed,
            "Hint decision made"
        );

        let thread = self.threads.load_thread(ticket_id).await?;
        let mut history = thread.comments;
        // The pipeline may already have stored the comment being answered.
        if history
            .last()
            .is_some_and(|c| c.author == CommentAuthor::Support && c.body.trim() == support_comment)
        {
            history.pop();
        }

        let reply = self
            .responder
            .respond(PersonaRequest {
                ticket_id,
                ticket: thread.context,
                history,
                support_comment: support_comment.to_string(),
                hint,
            })
            .await
            .map_err(|e| {
                tracing::warn!(ticket_id = %ticket_id, error = %e, "Persona generator failed, turn not recorded");
                e
            })?;

        let evaluation = classify_reply(reply.evaluation.as_deref()).map_err(|fault| {
            tracing::warn!(
                ticket_id = %ticket_id,
                raw_evaluation = ?reply.evaluation,
                error = %fault,
                "Classifier fault, turn not recorded"
            );
            fault
        })?;

        let lifecycle = state.transition(evaluation)?;

        let hint_given = decision.should_hint && reply.hint_given;
        if hint_given {
            state.record_hint_given();
        } else if decision.should_hint {
            tracing::debug!(ticket_id = %ticket_id, "Hint requested but not delivered");
        }

        let debug_state = state.snapshot();
        drop(state);

        if lifecycle == LifecycleState::Resolved {
            self.registry.remove(ticket_id).await;
        }

        tracing::info!(
            ticket_id = %ticket_id,
            evaluation = %evaluation,
            lifecycle_state = ?debug_state.lifecycle_state,
            turn_count = debug_state.turn_count,
            stuck_counter = debug_state.stuck_counter,
            hints_given = debug_state.hints_given,
            hint_given,
            "Simulated turn processed"
        );

        Ok(ProcessTurnResult {
            response: reply.response,
            evaluation,
            hint_given,
            emotional_state: reply.emotional_state,
            reasoning: reply.reasoning,
            debug_state,
        })
    }
}
