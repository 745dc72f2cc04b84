//! LLM Persona Responder - Plays the simulated end user through an AIProvider.
//!
//! The system prompt carries the ticket, the persona, the hidden expected
//! resolution, the evaluation rubric and (when the hint policy asked for one)
//! the hint instruction. The thread itself is replayed as chat turns: support
//! comments as `User`, customer comments as `Assistant`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::simulation::{HintInstruction, HintTrigger};
use crate::ports::{
    AIError, AIProvider, CommentAuthor, CompletionRequest, MessageRole, PersonaReply,
    PersonaRequest, PersonaResponder, RequestMetadata, TicketContext,
};

use super::reply_parser::parse_persona_reply;

/// Generation settings for the persona.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmPersonaResponderConfig {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmPersonaResponderConfig {
    fn default() -> Self {
        Self {
            max_tokens: 800,
            temperature: 0.7,
        }
    }
}

/// Persona responder backed by a generative model
pub struct LlmPersonaResponder<P: AIProvider + ?Sized> {
    provider: Arc<P>,
    config: LlmPersonaResponderConfig,
}

impl<P: AIProvider + ?Sized> LlmPersonaResponder<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_config(provider, LlmPersonaResponderConfig::default())
    }

    pub fn with_config(provider: Arc<P>, config: LlmPersonaResponderConfig) -> Self {
        Self { provider, config }
    }

    fn build_request(&self, request: &PersonaRequest) -> CompletionRequest {
        let metadata = RequestMetadata::new(request.ticket_id, request.ticket_id.to_string());

        let completion = request.history.iter().fold(
            CompletionRequest::new(metadata)
                .with_system_prompt(build_system_prompt(&request.ticket, request.hint.as_ref()))
                .with_max_tokens(self.config.max_tokens)
                .with_temperature(self.config.temperature),
            |completion, comment| {
                let role = match comment.author {
                    CommentAuthor::Support => MessageRole::User,
                    CommentAuthor::Customer => MessageRole::Assistant,
                };
                completion.with_message(role, comment.body.clone())
            },
        );

        completion.with_message(MessageRole::User, request.support_comment.clone())
    }
}

#[async_trait]
impl<P: AIProvider + ?Sized> PersonaResponder for LlmPersonaResponder<P> {
    async fn respond(&self, request: PersonaRequest) -> Result<PersonaReply, AIError> {
        let completion = self.provider.complete(self.build_request(&request)).await?;

        let mut reply = parse_persona_reply(&completion.content).map_err(|e| {
            tracing::warn!(
                ticket_id = %request.ticket_id,
                model = %completion.model,
                error = %e,
                "Persona reply could not be parsed"
            );
            e
        })?;

        // A hint nobody asked for does not count against the cap.
        reply.hint_given &= request.hint.is_some();

        tracing::debug!(
            ticket_id = %request.ticket_id,
            evaluation = ?reply.evaluation,
            hint_given = reply.hint_given,
            prompt_tokens = completion.usage.prompt_tokens,
            completion_tokens = completion.usage.completion_tokens,
            "Persona reply generated"
        );

        Ok(reply)
    }
}

const RUBRIC: &str = "\
Judge the support agent's latest message against the expected resolution:
- EARLY: generic questions or steps unrelated to the real cause.
- PROGRESSING: on a useful track, but the cause is not identified yet.
- CLOSE: the right area, one step away from the fix.
- SOLVED: the agent gave the fix and it works for you.";

const OUTPUT_CONTRACT: &str = "\
Reply with a single JSON object and nothing else:
{\"response\": \"<your reply as the customer>\", \"evaluation\": \"EARLY|PROGRESSING|CLOSE|SOLVED\", \
\"hintGiven\": <true if your reply contains the hint>, \"emotionalState\": \"<one word>\", \
\"reasoning\": \"<one sentence on why you chose the evaluation>\"}";

fn build_system_prompt(ticket: &TicketContext, hint: Option<&HintInstruction>) -> String {
    let mut persona = format!(
        "You are {}, an end user who opened a helpdesk ticket. Stay in character \
         and never reveal that you are simulated.",
        ticket.persona.name
    );
    if !ticket.persona.description.trim().is_empty() {
        persona.push_str("\nAbout you: ");
        persona.push_str(ticket.persona.description.trim());
    }

    let mut sections = vec![
        persona,
        format!(
            "Ticket subject: {}\nYour problem: {}",
            ticket.subject, ticket.description
        ),
    ];
    if let Some(resolution) = &ticket.expected_resolution {
        sections.push(format!(
            "The real fix (secret, never state it outright): {}",
            resolution
        ));
    }
    sections.push(RUBRIC.to_string());
    if let Some(hint) = hint.filter(|h| h.give_hint) {
        sections.push(hint_guidance(hint));
    }
    sections.push(OUTPUT_CONTRACT.to_string());

    sections.join("\n\n")
}

fn hint_guidance(hint: &HintInstruction) -> String {
    let nudge = match hint.hint_type {
        HintTrigger::Early => "mention a symptom or detail you had not brought up yet that points toward the real cause",
        HintTrigger::Progressing => "mention something you noticed that narrows down where the problem is",
        HintTrigger::Close => "describe exactly what you see when you try their suggestion so they can spot the last step",
    };

    format!(
        "The agent has been stuck for {} turns. Naturally {}. This is hint #{}; \
         keep it subtle and do not give away the fix. Set \"hintGiven\" to true only if you did.",
        hint.stuck_duration, nudge, hint.hint_number
    )
}
