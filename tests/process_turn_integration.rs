//! Integration tests for the simulated turn pipeline.
//!
//! Drives `ProcessTurnHandler` end to end with the in-memory registry, the
//! in-memory thread store and a scripted persona, covering the documented
//! scenarios plus concurrent turns on the same ticket.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use helpdesk_sim::adapters::{
    InMemoryConversationRegistry, InMemoryTicketThreads, LlmPersonaResponder, MockAIProvider,
    MockPersonaResponder,
};
use helpdesk_sim::application::{ProcessTurnCommand, ProcessTurnError, ProcessTurnHandler};
use helpdesk_sim::domain::foundation::TicketId;
use helpdesk_sim::domain::simulation::{Evaluation, HintPolicyConfig, HintTrigger, LifecycleState};
use helpdesk_sim::ports::{
    ConversationRegistry, PersonaProfile, PersonaReply, PersonaResponder, ThreadComment,
    TicketContext, TicketThread,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Pipeline {
    registry: Arc<InMemoryConversationRegistry>,
    handler: ProcessTurnHandler,
    ticket_id: TicketId,
}

impl Pipeline {
    async fn new(responder: Arc<dyn PersonaResponder>) -> Self {
        let registry = Arc::new(InMemoryConversationRegistry::new());
        let threads = Arc::new(InMemoryTicketThreads::new());
        let ticket_id = TicketId::new();
        threads.put(ticket_id, ticket_thread()).await;

        let handler = ProcessTurnHandler::new(registry.clone(), threads, responder);

        Self {
            registry,
            handler,
            ticket_id,
        }
    }

    async fn turn(
        &self,
        policy: HintPolicyConfig,
    ) -> Result<helpdesk_sim::application::ProcessTurnResult, ProcessTurnError> {
        self.handler
            .handle(ProcessTurnCommand {
                ticket_id: self.ticket_id,
                support_comment: "Have you tried turning it off and on again?".to_string(),
                policy,
            })
            .await
    }
}

fn ticket_thread() -> TicketThread {
    TicketThread {
        context: TicketContext {
            subject: "Shared drive missing".to_string(),
            description: "The S: drive disappeared from my computer".to_string(),
            persona: PersonaProfile {
                name: "Alex".to_string(),
                description: "Sales rep, impatient".to_string(),
            },
            expected_resolution: Some("Reconnect the VPN, then remap the drive".to_string()),
        },
        comments: vec![ThreadComment::customer("My S: drive is gone!")],
    }
}

fn scenario_policy() -> HintPolicyConfig {
    HintPolicyConfig {
        enabled: true,
        early_threshold: 3,
        progress_threshold: None,
        close_threshold: None,
        cooldown_turns: 0,
        max_hints: 999,
    }
}

fn scripted(evaluations: &[&str]) -> MockPersonaResponder {
    evaluations
        .iter()
        .fold(MockPersonaResponder::new(), |mock, evaluation| {
            mock.with_reply(PersonaReply::new("...", *evaluation).with_hint_given(true))
        })
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn three_early_turns_trigger_a_hint_on_the_next_reply() {
    let responder = Arc::new(scripted(&["EARLY", "EARLY", "EARLY", "EARLY"]));
    let pipeline = Pipeline::new(responder.clone()).await;

    for _ in 0..3 {
        pipeline.turn(scenario_policy()).await.unwrap();
    }
    let fourth = pipeline.turn(scenario_policy()).await.unwrap();

    let calls = responder.get_calls();
    assert!(calls[..3].iter().all(|c| c.hint.is_none()));
    let hint = calls[3].hint.unwrap();
    assert_eq!(hint.hint_type, HintTrigger::Early);
    assert_eq!(hint.stuck_duration, 3);
    assert!(fourth.hint_given);
}

#[tokio::test]
async fn evaluation_change_resets_stuck_counter() {
    let responder = Arc::new(scripted(&["EARLY", "PROGRESSING", "EARLY", "EARLY", "EARLY", "EARLY"]));
    let pipeline = Pipeline::new(responder.clone()).await;

    let mut stuck = Vec::new();
    for _ in 0..5 {
        stuck.push(pipeline.turn(scenario_policy()).await.unwrap().debug_state.stuck_counter);
    }
    pipeline.turn(scenario_policy()).await.unwrap();

    assert_eq!(stuck, vec![1, 1, 1, 2, 3]);
    let hinted: Vec<bool> = responder.get_calls().iter().map(|c| c.hint.is_some()).collect();
    assert_eq!(hinted, vec![false, false, false, false, false, true]);
}

#[tokio::test]
async fn hint_cap_of_one_is_never_exceeded() {
    let responder = Arc::new(scripted(&["EARLY"; 12]));
    let pipeline = Pipeline::new(responder.clone()).await;
    let policy = HintPolicyConfig {
        early_threshold: 2,
        max_hints: 1,
        ..scenario_policy()
    };

    let mut last = None;
    for _ in 0..12 {
        last = Some(pipeline.turn(policy).await.unwrap());
    }

    assert_eq!(last.unwrap().debug_state.hints_given, 1);
    let instructed = responder.get_calls().iter().filter(|c| c.hint.is_some()).count();
    assert_eq!(instructed, 1);
}

#[tokio::test]
async fn solved_resolves_and_drops_registry_entry() {
    let responder = Arc::new(scripted(&["EARLY", "EARLY", "SOLVED"]));
    let pipeline = Pipeline::new(responder.clone()).await;
    let policy = HintPolicyConfig {
        early_threshold: 2,
        ..scenario_policy()
    };

    pipeline.turn(policy).await.unwrap();
    pipeline.turn(policy).await.unwrap();
    let solved = pipeline.turn(policy).await.unwrap();

    // A hint was on offer for the third reply.
    assert!(responder.get_calls()[2].hint.is_some());
    assert_eq!(solved.evaluation, Evaluation::Solved);
    assert_eq!(solved.debug_state.lifecycle_state, LifecycleState::Resolved);
    assert!(pipeline.registry.find(pipeline.ticket_id).await.is_none());
}

#[tokio::test]
async fn cooldown_of_two_spaces_hints_three_turns_apart() {
    let responder = Arc::new(scripted(&["EARLY"; 8]));
    let pipeline = Pipeline::new(responder.clone()).await;
    let policy = HintPolicyConfig {
        early_threshold: 1,
        cooldown_turns: 2,
        ..scenario_policy()
    };

    for _ in 0..8 {
        pipeline.turn(policy).await.unwrap();
    }

    // Decisions are taken before each turn: turn 1 has no evaluation yet.
    let hinted: Vec<bool> = responder.get_calls().iter().map(|c| c.hint.is_some()).collect();
    assert_eq!(
        hinted,
        vec![false, true, false, false, true, false, false, true]
    );
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn concurrent_turns_on_one_ticket_are_serialized() {
    let responder = Arc::new(
        scripted(&["EARLY"; 6]).with_delay(Duration::from_millis(20)),
    );
    let pipeline = Arc::new(Pipeline::new(responder.clone()).await);

    let results = join_all((0..6).map(|_| {
        let pipeline = pipeline.clone();
        async move { pipeline.turn(scenario_policy()).await.unwrap() }
    }))
    .await;

    let mut turns: Vec<u32> = results.iter().map(|r| r.debug_state.turn_count).collect();
    turns.sort_unstable();
    assert_eq!(turns, vec![1, 2, 3, 4, 5, 6]);

    let mut stuck: Vec<u32> = results.iter().map(|r| r.debug_state.stuck_counter).collect();
    stuck.sort_unstable();
    assert_eq!(stuck, vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn concurrent_turns_on_different_tickets_do_not_share_state() {
    let responder: Arc<dyn PersonaResponder> = Arc::new(scripted(&["EARLY"; 4]));
    let first = Pipeline::new(responder.clone()).await;
    let second = Pipeline::new(responder).await;

    let (a, b) = tokio::join!(first.turn(scenario_policy()), second.turn(scenario_policy()));

    assert_eq!(a.unwrap().debug_state.turn_count, 1);
    assert_eq!(b.unwrap().debug_state.turn_count, 1);
}

#[tokio::test]
async fn duplicate_turn_after_solve_starts_a_fresh_conversation() {
    let responder = Arc::new(scripted(&["SOLVED", "EARLY"]));
    let pipeline = Pipeline::new(responder).await;

    pipeline.turn(scenario_policy()).await.unwrap();
    let retry = pipeline.turn(scenario_policy()).await.unwrap();

    assert_eq!(retry.debug_state.turn_count, 1);
    assert_eq!(retry.debug_state.lifecycle_state, LifecycleState::Active);
}

// =============================================================================
// LLM-backed persona
// =============================================================================

#[tokio::test]
async fn llm_persona_reply_flows_through_pipeline() {
    let provider = Arc::new(MockAIProvider::new().with_response(
        "```json\n{\"response\": \"Oh, the VPN icon is red.\", \"evaluation\": \"progressing\", \"emotionalState\": \"curious\"}\n```",
    ));
    let pipeline = Pipeline::new(Arc::new(LlmPersonaResponder::new(provider.clone()))).await;

    let result = pipeline.turn(scenario_policy()).await.unwrap();

    assert_eq!(result.evaluation, Evaluation::Progressing);
    assert_eq!(result.emotional_state.as_deref(), Some("curious"));
    let request = &provider.get_calls()[0];
    assert!(request
        .system_prompt
        .as_deref()
        .unwrap_or_default()
        .contains("Reconnect the VPN"));
}

#[tokio::test]
async fn llm_persona_prose_is_rejected_without_recording() {
    let provider = Arc::new(MockAIProvider::new().with_response("Sorry, I can't help with that."));
    let pipeline = Pipeline::new(Arc::new(LlmPersonaResponder::new(provider))).await;

    let err = pipeline.turn(scenario_policy()).await.unwrap_err();

    assert!(matches!(err, ProcessTurnError::Generator(_)));
    let conversation = pipeline.registry.find(pipeline.ticket_id).await.unwrap();
    assert_eq!(conversation.lock().await.turn_count(), 0);
}
