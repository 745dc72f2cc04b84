//! IdleEvictor - Background sweep for abandoned conversations.
//!
//! A trainee can walk away from a ticket before it is solved. Without a
//! sweep, that conversation would stay in the registry forever.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `sweep_interval` | 10 min | How often to look for idle conversations |
//! | `idle_ttl` | 24 h | Idle time after which a conversation is dropped |
//!
//! ## Graceful Shutdown
//!
//! The sweep listens for a shutdown signal and exits after the current pass.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

use crate::domain::foundation::Timestamp;
use crate::ports::ConversationRegistry;

/// Configuration for the idle sweep
#[derive(Debug, Clone)]
pub struct IdleEvictorConfig {
    /// How often to sweep
    pub sweep_interval: Duration,

    /// How long a conversation may sit idle
    pub idle_ttl: Duration,
}

impl Default for IdleEvictorConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(10 * 60),
            idle_ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl IdleEvictorConfig {
    /// Set the sweep interval
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Set the idle time-to-live
    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = ttl;
        self
    }
}

/// Periodically evicts idle conversations from a registry
pub struct IdleEvictor {
    registry: Arc<dyn ConversationRegistry>,
    config: IdleEvictorConfig,
}

impl IdleEvictor {
    /// Create an evictor with default configuration
    pub fn new(registry: Arc<dyn ConversationRegistry>) -> Self {
        Self::with_config(registry, IdleEvictorConfig::default())
    }

    /// Create an evictor with custom configuration
    pub fn with_config(registry: Arc<dyn ConversationRegistry>, config: IdleEvictorConfig) -> Self {
        Self { registry, config }
    }

    /// Run until `shutdown` flips to true
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.sweep_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::debug!("Idle eviction stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.sweep_once().await;
                }
            }
        }
    }

    /// Run a single sweep
    ///
    /// # Returns
    /// The number of evicted conversations
    pub async fn sweep_once(&self) -> usize {
        let cutoff = Timestamp::now().minus_secs(self.config.idle_ttl.as_secs());
        let evicted = self.registry.evict_idle(cutoff).await;

        if evicted > 0 {
            let remaining = self.registry.len().await;
            tracing::info!(evicted, remaining, "Evicted idle simulated conversations");
        }

        evicted
    }
}
