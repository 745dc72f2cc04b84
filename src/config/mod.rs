//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `HELPDESK_SIM` prefix and
//! nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use helpdesk_sim::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Early threshold: {}", config.hints.early_threshold);
//! ```

mod ai;
mod error;
mod registry;
mod server;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use registry::RegistryConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

use crate::domain::simulation::HintPolicyConfig;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// development setup backed by the mock AI provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration
    #[serde(default)]
    pub ai: AiConfig,

    /// Administrator-editable hint policy
    #[serde(default)]
    pub hints: HintPolicyConfig,

    /// Conversation registry eviction
    #[serde(default)]
    pub registry: RegistryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `HELPDESK_SIM` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `HELPDESK_SIM__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `HELPDESK_SIM__HINTS__PROGRESS_THRESHOLD=4` -> `hints.progress_threshold = Some(4)`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HELPDESK_SIM")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Invalid hint thresholds are rejected here so the engine can trust the
    /// policy it is handed.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.hints.validate()?;
        self.registry.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "HELPDESK_SIM__SERVER__PORT",
        "HELPDESK_SIM__SERVER__ENVIRONMENT",
        "HELPDESK_SIM__AI__ANTHROPIC_API_KEY",
        "HELPDESK_SIM__HINTS__ENABLED",
        "HELPDESK_SIM__HINTS__EARLY_THRESHOLD",
        "HELPDESK_SIM__HINTS__PROGRESS_THRESHOLD",
        "HELPDESK_SIM__HINTS__MAX_HINTS",
        "HELPDESK_SIM__REGISTRY__IDLE_TTL_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        clear_env();
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.hints, HintPolicyConfig::default());
        assert_eq!(config.registry, RegistryConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_hint_policy_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("HELPDESK_SIM__HINTS__ENABLED", "false"),
            ("HELPDESK_SIM__HINTS__EARLY_THRESHOLD", "5"),
            ("HELPDESK_SIM__HINTS__PROGRESS_THRESHOLD", "4"),
            ("HELPDESK_SIM__HINTS__MAX_HINTS", "1"),
        ])
        .unwrap();

        assert!(!config.hints.enabled);
        assert_eq!(config.hints.early_threshold, 5);
        assert_eq!(config.hints.progress_threshold, Some(4));
        assert_eq!(config.hints.close_threshold, None);
        assert_eq!(config.hints.max_hints, 1);
    }

    #[test]
    fn test_zero_threshold_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("HELPDESK_SIM__HINTS__EARLY_THRESHOLD", "0")]).unwrap();

        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidHintPolicy(_))
        ));
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("HELPDESK_SIM__SERVER__ENVIRONMENT", "production")]).unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_custom_server_port_and_ttl() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("HELPDESK_SIM__SERVER__PORT", "3000"),
            ("HELPDESK_SIM__REGISTRY__IDLE_TTL_SECS", "3600"),
        ])
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.registry.idle_ttl_secs, 3600);
    }

    #[test]
    fn test_api_key_enables_anthropic() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("HELPDESK_SIM__AI__ANTHROPIC_API_KEY", "sk-ant-test")]).unwrap();
        assert!(config.ai.has_anthropic());
    }
}
