//! PostgreSQL settings for the `postgres` storage backend
//!
//! The whole section is inert while the in-memory backend is selected, so
//! [`DatabaseConfig::validate_for`] takes the active backend and only checks
//! the fields when they will actually be used.

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::storage::StorageBackend;

/// The sweeper holds one connection while a sweep runs; requests need the rest.
pub const MIN_POOL_SIZE: u32 = 2;

pub const MAX_POOL_SIZE: u32 = 100;

/// Connection settings for the session, note and file tables.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` or `postgresql://` connection URL
    #[serde(default)]
    pub url: String,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// How long a request waits for a free connection before failing
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Server-side cap on a single statement, so a large file read or a
    /// sweep purge cannot pin a connection indefinitely. Zero disables it.
    #[serde(default = "default_statement_timeout")]
    pub statement_timeout_secs: u64,

    /// Apply the embedded schema migrations on startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Value for the `statement_timeout` session parameter, if one applies.
    pub fn statement_timeout_param(&self) -> Option<String> {
        (self.statement_timeout_secs > 0).then(|| format!("{}s", self.statement_timeout_secs))
    }

    /// The connection URL with any password replaced, for logging.
    pub fn redacted_url(&self) -> String {
        let Some(scheme_end) = self.url.find("://").map(|i| i + 3) else {
            return self.url.clone();
        };
        let rest = &self.url[scheme_end..];
        let Some(at) = rest.find('@') else {
            return self.url.clone();
        };
        match rest[..at].find(':') {
            Some(colon) => format!(
                "{}{}:***{}",
                &self.url[..scheme_end],
                &rest[..colon],
                &rest[at..]
            ),
            None => self.url.clone(),
        }
    }

    /// Validate the section for the selected storage backend.
    pub fn validate_for(&self, backend: StorageBackend) -> Result<(), ValidationError> {
        match backend {
            StorageBackend::Memory => Ok(()),
            StorageBackend::Postgres => self.validate(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("JOTZ__DATABASE__URL"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidDatabaseUrl);
        }
        if self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections < MIN_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooSmall(MIN_POOL_SIZE));
        }
        if self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        if self.acquire_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            statement_timeout_secs: default_statement_timeout(),
            run_migrations: default_run_migrations(),
        }
    }
}

fn default_min_connections() -> u32 {
    1
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    600
}

fn default_statement_timeout() -> u64 {
    30
}

fn default_run_migrations() -> bool {
    true
}
