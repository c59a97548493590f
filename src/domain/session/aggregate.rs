//! Session aggregate entity.
//!
//! A session is a named, time-boxed workspace. It exclusively owns the notes
//! and files stored under its identity; they are removed together with it.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, Timestamp};

use super::SessionName;

/// Session aggregate.
///
/// # Invariants
///
/// - `expires_at` is `created_at + ttl` and never changes
/// - The session is live at `t` iff `t < expires_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    name: SessionName,
    created_at: Timestamp,
    expires_at: Timestamp,
}

impl Session {
    /// Open a fresh session for `name` that lives for `ttl` from `now`.
    pub fn open(name: SessionName, ttl: Duration, now: Timestamp) -> Self {
        Self {
            id: SessionId::new(),
            name,
            created_at: now,
            expires_at: now.plus(ttl),
        }
    }

    /// Reconstitute a session from persistence (no validation).
    pub fn reconstitute(
        id: SessionId,
        name: SessionName,
        created_at: Timestamp,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            created_at,
            expires_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn name(&self) -> &SessionName {
        &self.name
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn expires_at(&self) -> &Timestamp {
        &self.expires_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expiry
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns true while `now` is before the expiry deadline.
    pub fn is_live_at(&self, now: &Timestamp) -> bool {
        now.is_before(&self.expires_at)
    }

    /// Returns true once `now >= expires_at`.
    pub fn is_expired_at(&self, now: &Timestamp) -> bool {
        !self.is_live_at(now)
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining_at(&self, now: &Timestamp) -> Duration {
        let remaining = self.expires_at.duration_since(now);
        if remaining < Duration::zero() {
            Duration::zero()
        } else {
            remaining
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha() -> SessionName {
        SessionName::new("alpha").unwrap()
    }

    #[test]
    fn open_sets_expiry_from_ttl() {
        let now = Timestamp::now();
        let session = Session::open(alpha(), Duration::hours(24), now);

        assert_eq!(session.created_at(), &now);
        assert_eq!(session.expires_at().duration_since(&now), Duration::hours(24));
        assert_eq!(session.name().as_str(), "alpha");
    }

    #[test]
    fn each_open_gets_a_new_identity() {
        let now = Timestamp::now();
        let first = Session::open(alpha(), Duration::hours(1), now);
        let second = Session::open(alpha(), Duration::hours(1), now);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn live_until_deadline_and_expired_at_it() {
        let now = Timestamp::now();
        let session = Session::open(alpha(), Duration::seconds(60), now);

        assert!(session.is_live_at(&now));
        assert!(session.is_live_at(&now.plus_secs(59)));
        assert!(session.is_expired_at(&now.plus_secs(60)));
        assert!(session.is_expired_at(&now.plus_secs(61)));
    }

    #[test]
    fn remaining_never_negative() {
        let now = Timestamp::now();
        let session = Session::open(alpha(), Duration::seconds(60), now);

        assert_eq!(session.remaining_at(&now.plus_secs(10)), Duration::seconds(50));
        assert_eq!(session.remaining_at(&now.plus_secs(600)), Duration::zero());
    }

    #[test]
    fn reconstitute_preserves_fields() {
        let id = SessionId::new();
        let created = Timestamp::now();
        let expires = created.plus_secs(10);
        let session = Session::reconstitute(id, alpha(), created, expires);

        assert_eq!(session.id(), &id);
        assert_eq!(session.expires_at(), &expires);
    }
}
