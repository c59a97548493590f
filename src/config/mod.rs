//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `JOTZ` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use jotz::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Sessions live for {}s", config.retention.session_ttl_secs);
//! ```

mod database;
mod error;
mod features;
mod retention;
mod server;
mod storage;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use features::FeatureFlags;
pub use retention::{RetentionConfig, MAX_SESSION_TTL_SECS};
pub use server::{Environment, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a runnable
/// in-memory server. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration (host, port, limits)
    #[serde(default)]
    pub server: ServerConfig,

    /// Session lifetime and sweep cadence
    #[serde(default)]
    pub retention: RetentionConfig,

    /// Storage backend selection
    #[serde(default)]
    pub storage: StorageConfig,

    /// Database configuration (PostgreSQL backend only)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Feature flags
    #[serde(default)]
    pub features: FeatureFlags,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `JOTZ` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `JOTZ__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `JOTZ__RETENTION__SESSION_TTL_SECS=3600` -> `retention.session_ttl_secs = 3600`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("JOTZ")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// The database section is only checked when the PostgreSQL backend is
    /// selected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.retention.validate()?;
        self.database.validate_for(self.storage.backend)?;
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
        "JOTZ__SERVER__PORT",
        "JOTZ__SERVER__ENVIRONMENT",
        "JOTZ__RETENTION__SESSION_TTL_SECS",
        "JOTZ__RETENTION__SWEEP_INTERVAL_SECS",
        "JOTZ__STORAGE__BACKEND",
        "JOTZ__DATABASE__URL",
        "JOTZ__FEATURES__ENABLE_SESSION_INDEX",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.retention.session_ttl_secs, 86_400);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(!config.features.enable_session_index);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("JOTZ__SERVER__PORT", "3000");
        env::set_var("JOTZ__RETENTION__SESSION_TTL_SECS", "3600");
        env::set_var("JOTZ__RETENTION__SWEEP_INTERVAL_SECS", "60");
        env::set_var("JOTZ__FEATURES__ENABLE_SESSION_INDEX", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.retention.session_ttl_secs, 3600);
        assert_eq!(config.retention.sweep_interval_secs, 60);
        assert!(config.features.enable_session_index);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("JOTZ__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_postgres_backend_requires_database_url() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("JOTZ__STORAGE__BACKEND", "postgres");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_memory_backend_ignores_database_section() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("JOTZ__DATABASE__URL", "mysql://elsewhere/db");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_postgres_backend_checks_database_url_scheme() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("JOTZ__STORAGE__BACKEND", "postgres");
        env::set_var("JOTZ__DATABASE__URL", "mysql://elsewhere/db");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(
            result.unwrap().validate(),
            Err(ValidationError::InvalidDatabaseUrl)
        ));
    }

    #[test]
    fn test_postgres_backend_with_url_is_valid() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("JOTZ__STORAGE__BACKEND", "postgres");
        env::set_var("JOTZ__DATABASE__URL", "postgres://jotz@localhost/jotz");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.storage.uses_postgres());
        assert!(config.validate().is_ok());
    }
}
