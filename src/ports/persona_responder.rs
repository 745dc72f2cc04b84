//! Persona Responder Port - The simulated end user.
//!
//! Given the ticket, the thread so far, the trainee's new comment and an
//! optional hint instruction, a responder writes the end user's reply and
//! self-reports how close the trainee is to the fix.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::foundation::TicketId;
use crate::domain::simulation::HintInstruction;

use super::{AIError, ThreadComment, TicketContext};

/// Port for generating persona replies
#[async_trait]
pub trait PersonaResponder: Send + Sync {
    /// Generate the persona's reply to a support comment
    ///
    /// # Errors
    /// Returns `AIError` if the underlying model call fails or its output
    /// cannot be read
    async fn respond(&self, request: PersonaRequest) -> Result<PersonaReply, AIError>;
}

/// Everything the persona needs for one reply.
#[derive(Debug, Clone)]
pub struct PersonaRequest {
    pub ticket_id: TicketId,
    pub ticket: TicketContext,
    /// Prior comments, oldest first, excluding `support_comment`.
    pub history: Vec<ThreadComment>,
    pub support_comment: String,
    /// Present only when the hint policy asked for a hint. May be ignored.
    pub hint: Option<HintInstruction>,
}

/// The persona's reply as reported by the generator.
///
/// `evaluation` is kept raw: classification is a separate, strict step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaReply {
    pub response: String,
    /// Non-string labels are kept as their JSON text so classification,
    /// not deserialization, rejects them.
    #[serde(default, deserialize_with = "deserialize_label")]
    pub evaluation: Option<String>,
    /// Whether the reply actually contains the requested hint.
    #[serde(default)]
    pub hint_given: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

fn deserialize_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(label)) => Some(label),
        Some(other) => Some(other.to_string()),
    })
}

impl PersonaReply {
    /// Creates a reply with an evaluation label and no hint.
    pub fn new(response: impl Into<String>, evaluation: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            evaluation: Some(evaluation.into()),
            hint_given: false,
            emotional_state: None,
            reasoning: None,
        }
    }

    /// Marks whether the reply surfaced a hint.
    pub fn with_hint_given(mut self, hint_given: bool) -> Self {
        self.hint_given = hint_given;
        self
    }

    /// Sets the persona's emotional state.
    pub fn with_emotional_state(mut self, state: impl Into<String>) -> Self {
        self.emotional_state = Some(state.into());
        self
    }

    /// Sets the generator's reasoning.
    pub fn with_reasoning(mut self, reasoning: impl Into<String>) -> Self {
        self.reasoning = Some(reasoning.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_reads_generator_field_names() {
        let json = r#"{
            "response": "Still broken, sorry.",
            "evaluation": "EARLY",
            "hintGiven": true,
            "emotionalState": "frustrated"
        }"#;

        let reply: PersonaReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.evaluation.as_deref(), Some("EARLY"));
        assert!(reply.hint_given);
        assert_eq!(reply.emotional_state.as_deref(), Some("frustrated"));
        assert_eq!(reply.reasoning, None);
    }

    #[test]
    fn test_reply_without_evaluation_keeps_it_absent() {
        let reply: PersonaReply = serde_json::from_str(r#"{ "response": "ok" }"#).unwrap();
        assert_eq!(reply.evaluation, None);
        assert!(!reply.hint_given);
    }

    #[test]
    fn test_reply_with_null_evaluation_keeps_it_absent() {
        let reply: PersonaReply =
            serde_json::from_str(r#"{ "response": "ok", "evaluation": null }"#).unwrap();
        assert_eq!(reply.evaluation, None);
    }

    #[test]
    fn test_reply_with_non_string_evaluation_still_parses() {
        let reply: PersonaReply =
            serde_json::from_str(r#"{ "response": "hi", "evaluation": 3 }"#).unwrap();
        assert_eq!(reply.evaluation.as_deref(), Some("3"));

        let reply: PersonaReply =
            serde_json::from_str(r#"{ "response": "hi", "evaluation": ["EARLY"] }"#).unwrap();
        assert_eq!(reply.evaluation.as_deref(), Some(r#"["EARLY"]"#));
    }
}
