//! Property tests for the conversation state machine and hint engine.
//!
//! Random evaluation sequences are played through `ConversationState` the
//! same way the turn pipeline does it: decide, transition, then record the
//! hint if one was granted and (randomly) delivered.

use proptest::prelude::*;

use helpdesk_sim::domain::foundation::TicketId;
use helpdesk_sim::domain::simulation::{
    ConversationState, Evaluation, HintPolicyConfig, HintTrigger, LifecycleState,
};

fn arb_non_terminal() -> impl Strategy<Value = Evaluation> {
    prop_oneof![
        Just(Evaluation::Early),
        Just(Evaluation::Progressing),
        Just(Evaluation::Close),
    ]
}

fn arb_threshold() -> impl Strategy<Value = Option<u32>> {
    prop_oneof![Just(None), (1u32..6).prop_map(Some)]
}

prop_compose! {
    fn arb_policy()(
        enabled in any::<bool>(),
        early_threshold in 1u32..6,
        progress_threshold in arb_threshold(),
        close_threshold in arb_threshold(),
        cooldown_turns in 0u32..4,
        max_hints in 1u32..5,
    ) -> HintPolicyConfig {
        HintPolicyConfig {
            enabled,
            early_threshold,
            progress_threshold,
            close_threshold,
            cooldown_turns,
            max_hints,
        }
    }
}

/// Plays one pipeline turn. Returns the trigger of a granted hint.
fn play(
    state: &mut ConversationState,
    policy: &HintPolicyConfig,
    evaluation: Evaluation,
    delivered: bool,
) -> Option<HintTrigger> {
    let decision = state.should_provide_hint(policy);
    state.transition(evaluation).unwrap();
    if decision.should_hint && delivered {
        state.record_hint_given();
    }
    decision.trigger.filter(|_| decision.should_hint)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: every processed evaluation counts as exactly one turn.
    #[test]
    fn prop_turn_count_equals_sequence_length(
        evaluations in prop::collection::vec(arb_non_terminal(), 0..40),
    ) {
        let mut state = ConversationState::new(TicketId::new());
        for evaluation in &evaluations {
            state.transition(*evaluation).unwrap();
        }
        prop_assert_eq!(state.turn_count() as usize, evaluations.len());
    }

    /// Property: the stuck counter is 1 right after a change and otherwise
    /// grows by one.
    #[test]
    fn prop_stuck_counter_tracks_consecutive_repeats(
        evaluations in prop::collection::vec(arb_non_terminal(), 1..40),
    ) {
        let mut state = ConversationState::new(TicketId::new());
        let mut previous: Option<Evaluation> = None;
        let mut expected = 0u32;

        for evaluation in evaluations {
            state.transition(evaluation).unwrap();
            expected = if previous == Some(evaluation) { expected + 1 } else { 1 };
            prop_assert_eq!(state.stuck_counter(), expected);
            previous = Some(evaluation);
        }
    }

    /// Property: hints never exceed the cap, whatever the policy.
    #[test]
    fn prop_hints_never_exceed_cap(
        policy in arb_policy(),
        turns in prop::collection::vec((arb_non_terminal(), any::<bool>()), 0..60),
    ) {
        let mut state = ConversationState::new(TicketId::new());
        for (evaluation, delivered) in turns {
            play(&mut state, &policy, evaluation, delivered);
            prop_assert!(state.hints_given() <= policy.max_hints);
        }
    }

    /// Property: a disabled trigger never fires.
    #[test]
    fn prop_disabled_triggers_never_fire(
        policy in arb_policy(),
        turns in prop::collection::vec((arb_non_terminal(), any::<bool>()), 0..60),
    ) {
        let mut state = ConversationState::new(TicketId::new());
        for (evaluation, delivered) in turns {
            let trigger = play(&mut state, &policy, evaluation, delivered);
            if policy.progress_threshold.is_none() {
                prop_assert_ne!(trigger, Some(HintTrigger::Progressing));
            }
            if policy.close_threshold.is_none() {
                prop_assert_ne!(trigger, Some(HintTrigger::Close));
            }
            if !policy.enabled {
                prop_assert_eq!(trigger, None);
            }
        }
    }

    /// Property: granted hints are at least `cooldown_turns + 1` turns apart.
    #[test]
    fn prop_cooldown_spaces_delivered_hints(
        policy in arb_policy(),
        turns in prop::collection::vec((arb_non_terminal(), any::<bool>()), 0..60),
    ) {
        let mut state = ConversationState::new(TicketId::new());
        let mut last_hint_turn: Option<u32> = None;

        for (evaluation, delivered) in turns {
            let before = state.hints_given();
            play(&mut state, &policy, evaluation, delivered);
            if state.hints_given() > before {
                let turn = state.turn_count();
                if let Some(last) = last_hint_turn {
                    prop_assert!(turn - last > policy.cooldown_turns);
                }
                last_hint_turn = Some(turn);
            }
        }
    }

    /// Property: once SOLVED, no hint is offered and transitions are rejected
    /// without touching the state.
    #[test]
    fn prop_resolved_is_final(
        policy in arb_policy(),
        prefix in prop::collection::vec(arb_non_terminal(), 0..20),
        after in prop::collection::vec(arb_non_terminal(), 1..5),
    ) {
        let mut state = ConversationState::new(TicketId::new());
        for evaluation in prefix {
            state.transition(evaluation).unwrap();
        }
        prop_assert_eq!(
            state.transition(Evaluation::Solved).unwrap(),
            LifecycleState::Resolved
        );

        let frozen = state.clone();
        prop_assert!(!state.should_provide_hint(&policy).should_hint);
        for evaluation in after {
            prop_assert!(state.transition(evaluation).is_err());
            prop_assert!(state.transition(Evaluation::Solved).is_err());
        }
        prop_assert_eq!(state, frozen);
    }
}
