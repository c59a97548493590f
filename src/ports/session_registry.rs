//! Session registry port.
//!
//! Maps a session name to the session currently owning it and its expiry
//! deadline.
//!
//! # Design
//!
//! - **Linearizable per name**: `lookup` and `register` for the same name
//!   must not interleave; two concurrent `register` calls for an unused name
//!   never both succeed
//! - **Lazy expiry**: `lookup` hides sessions whose deadline has passed
//! - **Sweep-gated reuse**: an expired entry keeps owning its name until the
//!   sweeper removes it with [`SessionRegistry::remove`]

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SessionId, Timestamp};
use crate::domain::session::{Session, SessionName};

/// Outcome of a registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The candidate now owns the name.
    Registered(Session),
    /// Another entry (live or awaiting sweep) already owns the name.
    AlreadyExists,
}

#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Find the live session for `name` as of `now`.
    ///
    /// Returns `None` if no entry exists or the entry has expired.
    async fn lookup(&self, name: &SessionName, now: Timestamp)
        -> Result<Option<Session>, DomainError>;

    /// Atomically claim `candidate.name()` for `candidate`.
    ///
    /// # Errors
    ///
    /// - `StorageFailure` on persistence failure
    async fn register(&self, candidate: Session) -> Result<Registration, DomainError>;

    /// All sessions live at `now`, oldest first.
    async fn list_live(&self, now: Timestamp) -> Result<Vec<Session>, DomainError>;

    /// All entries whose deadline is at or before `now`.
    async fn list_expired(&self, now: Timestamp) -> Result<Vec<Session>, DomainError>;

    /// Find an entry by identity, regardless of expiry.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// Remove the entry for `session.name()` if it still belongs to
    /// `session.id()`.
    ///
    /// Returns `false` when nothing was removed.
    async fn remove(&self, session: &Session) -> Result<bool, DomainError>;
}
