//! Conversation registry configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Idle eviction settings for live conversations
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Idle time after which an unsolved conversation is dropped
    #[serde(default = "default_idle_ttl")]
    pub idle_ttl_secs: u64,

    /// How often the eviction sweep runs
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl RegistryConfig {
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Validate registry configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.idle_ttl_secs == 0 {
            return Err(ValidationError::InvalidRegistrySetting(
                "idle_ttl_secs must be positive",
            ));
        }
        if self.sweep_interval_secs == 0 {
            return Err(ValidationError::InvalidRegistrySetting(
                "sweep_interval_secs must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: default_idle_ttl(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

fn default_idle_ttl() -> u64 {
    24 * 60 * 60
}

fn default_sweep_interval() -> u64 {
    10 * 60
}
