//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MEDINATOR` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a working
//! configuration pointed at a local inference service.
//!
//! # Example
//!
//! ```no_run
//! use medinator::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Inference service at {}", config.service.base_url);
//! ```

mod error;
mod interview;
mod logging;
mod service;

pub use error::{ConfigError, ValidationError};
pub use interview::InterviewConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use service::ServiceConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Inference service connection
    #[serde(default)]
    pub service: ServiceConfig,

    /// Interview pacing and timeouts
    #[serde(default)]
    pub interview: InterviewConfig,

    /// Tracing output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MEDINATOR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MEDINATOR__SERVICE__BASE_URL=http://scoring:5000` -> `service.base_url`
    /// - `MEDINATOR__INTERVIEW__TRANSITION_DWELL_MS=0` -> `interview.transition_dwell_ms`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MEDINATOR")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.service.validate()?;
        self.interview.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "MEDINATOR__SERVICE__BASE_URL",
        "MEDINATOR__SERVICE__API_KEY",
        "MEDINATOR__SERVICE__REQUEST_TIMEOUT_SECS",
        "MEDINATOR__INTERVIEW__TRANSITION_DWELL_MS",
        "MEDINATOR__INTERVIEW__TURN_TIMEOUT_SECS",
        "MEDINATOR__LOGGING__FORMAT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.service.base_url, "http://localhost:5000");
        assert_eq!(config.interview, InterviewConfig::default());
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("MEDINATOR__SERVICE__BASE_URL", "https://scoring.example.com");
        env::set_var("MEDINATOR__SERVICE__API_KEY", "key-123");
        env::set_var("MEDINATOR__INTERVIEW__TRANSITION_DWELL_MS", "0");
        env::set_var("MEDINATOR__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.service.base_url, "https://scoring.example.com");
        assert_eq!(
            config.service.api_key.as_ref().map(|k| k.expose_secret().as_str()),
            Some("key-123")
        );
        assert_eq!(config.interview.transition_dwell_ms, 0);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_validate_rejects_bad_turn_timeout() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("MEDINATOR__INTERVIEW__TURN_TIMEOUT_SECS", "0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.validate(), Err(ValidationError::InvalidTurnTimeout));
    }

    #[test]
    fn test_unparseable_value_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("MEDINATOR__SERVICE__REQUEST_TIMEOUT_SECS", "soon");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
