//! Evaluation labels reported for each support turn.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::ClassifierFault;

/// How close the latest support reply is to the correct resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Evaluation {
    /// The agent has not yet engaged with the real problem.
    Early,
    /// The agent is on a useful track.
    Progressing,
    /// The agent is one step away from the fix.
    Close,
    /// The agent delivered the correct resolution. Terminal.
    Solved,
}

impl Evaluation {
    /// Every label, in order of increasing closeness.
    pub const ALL: [Evaluation; 4] = [
        Evaluation::Early,
        Evaluation::Progressing,
        Evaluation::Close,
        Evaluation::Solved,
    ];

    /// Returns the wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Evaluation::Early => "EARLY",
            Evaluation::Progressing => "PROGRESSING",
            Evaluation::Close => "CLOSE",
            Evaluation::Solved => "SOLVED",
        }
    }

    /// Returns true if this label ends the conversation.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Evaluation::Solved)
    }

    /// Returns the hint trigger checked while this label is current.
    ///
    /// `None` for `Solved`, which never triggers a hint.
    pub fn hint_trigger(&self) -> Option<HintTrigger> {
        match self {
            Evaluation::Early => Some(HintTrigger::Early),
            Evaluation::Progressing => Some(HintTrigger::Progressing),
            Evaluation::Close => Some(HintTrigger::Close),
            Evaluation::Solved => None,
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Evaluation {
    type Err = ClassifierFault;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        if label.is_empty() {
            return Err(ClassifierFault::MissingEvaluation);
        }

        Evaluation::ALL
            .into_iter()
            .find(|evaluation| evaluation.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| ClassifierFault::UnknownEvaluation(label.to_string()))
    }
}

/// Which stuck threshold produced a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HintTrigger {
    Early,
    Progressing,
    Close,
}

impl fmt::Display for HintTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HintTrigger::Early => "EARLY",
            HintTrigger::Progressing => "PROGRESSING",
            HintTrigger::Close => "CLOSE",
        };
        f.write_str(s)
    }
}

/// Classifies a generator reply by its self-reported evaluation label.
///
/// # Errors
///
/// Returns `ClassifierFault` when the label is absent, blank, or not one of
/// the four known values.
pub fn classify_reply(raw: Option<&str>) -> Result<Evaluation, ClassifierFault> {
    raw.ok_or(ClassifierFault::MissingEvaluation)?.parse()
}
