//! Reads the persona's JSON reply out of raw model output.
//!
//! Models wrap JSON in markdown fences or surround it with chatter often
//! enough that a strict `from_str` is not sufficient.

use crate::ports::{AIError, PersonaReply};

/// Parse a persona reply from model output.
///
/// Tries, in order: the whole text, a fenced code block, and the first
/// balanced `{...}` object.
///
/// # Errors
/// Returns `AIError::Parse` if no candidate deserializes or the reply text
/// is blank
pub fn parse_persona_reply(raw: &str) -> Result<PersonaReply, AIError> {
    let trimmed = raw.trim();

    let candidates = [
        Some(trimmed.to_string()),
        extract_from_code_block(trimmed),
        trimmed
            .find('{')
            .and_then(|start| extract_balanced_object(trimmed, start)),
    ];

    let mut last_error = None;
    for candidate in candidates.into_iter().flatten() {
        match serde_json::from_str::<PersonaReply>(&candidate) {
            Ok(reply) if reply.response.trim().is_empty() => {
                return Err(AIError::parse("persona reply has empty response text"));
            }
            Ok(reply) => return Ok(reply),
            Err(e) => last_error = Some(e),
        }
    }

    Err(AIError::parse(match last_error {
        Some(e) => format!("persona reply is not valid JSON: {}", e),
        None => "persona reply is empty".to_string(),
    }))
}

fn extract_from_code_block(s: &str) -> Option<String> {
    let patterns = ["```json\n", "```json\r\n", "```\n", "```\r\n"];

    patterns.iter().find_map(|pattern| {
        let start = s.find(pattern)? + pattern.len();
        let end = s[start..].find("```")?;
        Some(s[start..start + end].trim().to_string())
    })
}

/// Returns the object starting at byte offset `start`, honoring strings.
fn extract_balanced_object(s: &str, start: usize) -> Option<String> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (offset, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(s[start..start + offset + 1].to_string());
                }
            }
            _ => {}
        }
    }
    None
}
