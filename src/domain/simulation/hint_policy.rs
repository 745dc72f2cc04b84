//! Hint policy and decision engine.
//!
//! Decides whether the simulated end user should slip a hint into their next
//! reply. Pure: reads a conversation, never mutates it.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::conversation::ConversationState;
use super::evaluation::HintTrigger;

/// Administrator-editable hint policy.
///
/// Validated once when settings are loaded; the engine trusts it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintPolicyConfig {
    /// Master switch for hints.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Consecutive EARLY turns before a hint.
    #[serde(default = "default_early_threshold")]
    pub early_threshold: u32,

    /// Consecutive PROGRESSING turns before a hint. `None` disables the trigger.
    #[serde(default)]
    pub progress_threshold: Option<u32>,

    /// Consecutive CLOSE turns before a hint. `None` disables the trigger.
    #[serde(default)]
    pub close_threshold: Option<u32>,

    /// Minimum turns between two granted hints.
    #[serde(default = "default_cooldown_turns")]
    pub cooldown_turns: u32,

    /// Hard cap on hints per conversation.
    #[serde(default = "default_max_hints")]
    pub max_hints: u32,
}

impl HintPolicyConfig {
    /// Validate documented ranges.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.early_threshold < 1 {
            return Err(ValidationError::below_minimum(
                "early_threshold",
                1,
                i64::from(self.early_threshold),
            ));
        }
        if let Some(threshold) = self.progress_threshold.filter(|t| *t < 1) {
            return Err(ValidationError::below_minimum(
                "progress_threshold",
                1,
                i64::from(threshold),
            ));
        }
        if let Some(threshold) = self.close_threshold.filter(|t| *t < 1) {
            return Err(ValidationError::below_minimum(
                "close_threshold",
                1,
                i64::from(threshold),
            ));
        }
        if self.max_hints < 1 {
            return Err(ValidationError::below_minimum(
                "max_hints",
                1,
                i64::from(self.max_hints),
            ));
        }
        Ok(())
    }

    /// Returns the stuck threshold for a trigger, if that trigger is enabled.
    pub fn threshold_for(&self, trigger: HintTrigger) -> Option<u32> {
        match trigger {
            HintTrigger::Early => Some(self.early_threshold),
            HintTrigger::Progressing => self.progress_threshold,
            HintTrigger::Close => self.close_threshold,
        }
    }
}

impl Default for HintPolicyConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            early_threshold: default_early_threshold(),
            progress_threshold: None,
            close_threshold: None,
            cooldown_turns: default_cooldown_turns(),
            max_hints: default_max_hints(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_early_threshold() -> u32 {
    3
}

fn default_cooldown_turns() -> u32 {
    2
}

fn default_max_hints() -> u32 {
    3
}

/// Why a hint was withheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuppressionReason {
    /// Hints are switched off in the policy.
    Disabled,
    /// The conversation already reached SOLVED.
    Resolved,
    /// `max_hints` already granted.
    CapReached,
    /// Too few turns since the last hint.
    Cooldown,
    /// No turn has been evaluated yet.
    NoEvaluation,
    /// The current evaluation never triggers hints.
    Terminal,
    /// The threshold for the current evaluation is disabled.
    TriggerDisabled,
    /// Stuck counter has not reached the threshold.
    BelowThreshold,
}

/// Outcome of a hint evaluation. Transient, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HintDecision {
    pub should_hint: bool,
    pub trigger: Option<HintTrigger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppressed: Option<SuppressionReason>,
}

impl HintDecision {
    /// A granted hint for the given trigger.
    pub fn grant(trigger: HintTrigger) -> Self {
        Self {
            should_hint: true,
            trigger: Some(trigger),
            suppressed: None,
        }
    }

    /// A withheld hint.
    pub fn suppress(reason: SuppressionReason) -> Self {
        Self {
            should_hint: false,
            trigger: None,
            suppressed: Some(reason),
        }
    }

    /// Builds the optional generator instruction for an affirmative decision.
    pub fn instruction(&self, conversation: &ConversationState) -> Option<HintInstruction> {
        let trigger = self.trigger.filter(|_| self.should_hint)?;
        Some(HintInstruction {
            give_hint: true,
            hint_type: trigger,
            hint_number: conversation.hints_given().saturating_add(1),
            stuck_duration: conversation.stuck_counter(),
        })
    }
}

/// Instruction handed to the persona-response generator. It may be ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintInstruction {
    pub give_hint: bool,
    pub hint_type: HintTrigger,
    /// 1-based ordinal of the hint about to be given.
    pub hint_number: u32,
    /// Turns spent on the current evaluation.
    pub stuck_duration: u32,
}

/// Evaluates a hint policy against a conversation.
#[derive(Debug, Clone, Copy)]
pub struct HintDecisionEngine {
    policy: HintPolicyConfig,
}

impl HintDecisionEngine {
    /// Creates a new engine with the given policy.
    pub fn new(policy: HintPolicyConfig) -> Self {
        Self { policy }
    }

    /// Returns the policy in force.
    pub fn policy(&self) -> &HintPolicyConfig {
        &self.policy
    }

    /// Decides whether the next persona reply should carry a hint.
    ///
    /// Only the threshold for the current evaluation is consulted.
    pub fn decide(&self, conversation: &ConversationState) -> HintDecision {
        if !self.policy.enabled {
            return HintDecision::suppress(SuppressionReason::Disabled);
        }
        if !conversation.state().is_active() {
            return HintDecision::suppress(SuppressionReason::Resolved);
        }
        if conversation.hints_given() >= self.policy.max_hints {
            return HintDecision::suppress(SuppressionReason::CapReached);
        }
        if self.in_cooldown(conversation) {
            return HintDecision::suppress(SuppressionReason::Cooldown);
        }

        let Some(evaluation) = conversation.current_evaluation() else {
            return HintDecision::suppress(SuppressionReason::NoEvaluation);
        };
        let Some(trigger) = evaluation.hint_trigger() else {
            return HintDecision::suppress(SuppressionReason::Terminal);
        };
        let Some(threshold) = self.policy.threshold_for(trigger) else {
            return HintDecision::suppress(SuppressionReason::TriggerDisabled);
        };

        if conversation.stuck_counter() >= threshold {
            HintDecision::grant(trigger)
        } else {
            HintDecision::suppress(SuppressionReason::BelowThreshold)
        }
    }

    fn in_cooldown(&self, conversation: &ConversationState) -> bool {
        conversation.last_hint_turn().is_some_and(|last| {
            conversation.turn_count().saturating_sub(last) < self.policy.cooldown_turns
        })
    }
}
