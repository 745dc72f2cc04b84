//! Mock Persona Responder for testing.
//!
//! Scripted replies (or errors) consumed in order, with call capture so
//! tests can assert which hint instruction reached the persona.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{AIError, PersonaReply, PersonaRequest, PersonaResponder};

#[derive(Debug)]
enum Scripted {
    Reply(PersonaReply),
    Error(AIError),
}

/// Persona responder that replays a script.
#[derive(Debug, Clone, Default)]
pub struct MockPersonaResponder {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    calls: Arc<Mutex<Vec<PersonaRequest>>>,
    delay: Duration,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockPersonaResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply.
    pub fn with_reply(self, reply: PersonaReply) -> Self {
        locked(&self.script).push_back(Scripted::Reply(reply));
        self
    }

    /// Queues a plain reply carrying `evaluation`.
    pub fn with_evaluation(self, evaluation: &str) -> Self {
        self.with_reply(PersonaReply::new(format!("({})", evaluation), evaluation))
    }

    /// Queues an error.
    pub fn with_error(self, error: AIError) -> Self {
        locked(&self.script).push_back(Scripted::Error(error));
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    pub fn get_calls(&self) -> Vec<PersonaRequest> {
        locked(&self.calls).clone()
    }
}

#[async_trait]
impl PersonaResponder for MockPersonaResponder {
    async fn respond(&self, request: PersonaRequest) -> Result<PersonaReply, AIError> {
        locked(&self.calls).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let next = locked(&self.script).pop_front();
        match next {
            Some(Scripted::Reply(reply)) => Ok(reply),
            Some(Scripted::Error(err)) => Err(err),
            None => Err(AIError::unavailable("mock persona script exhausted")),
        }
    }
}
