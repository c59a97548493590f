//! ResolveSessionHandler - Create-or-join a session by name.
//!
//! 1. Try to register a fresh session under the name
//! 2. If the name is taken, join the live session that owns it
//! 3. If no live owner is visible (it expired, or a racing claim vanished),
//!    retry the registration once
//! 4. Otherwise report a conflict the caller may retry later

use std::sync::Arc;

use chrono::Duration;

use crate::domain::foundation::Timestamp;
use crate::domain::session::{Session, SessionError, SessionName};
use crate::ports::{Registration, SessionRegistry};

/// Registration attempts after the first one.
const MAX_RETRIES: usize = 1;

/// Command to create or join a session.
#[derive(Debug, Clone)]
pub struct ResolveSessionCommand {
    /// Name as typed by the user; validated by the handler.
    pub name: String,
}

/// Outcome of resolving a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A new session now owns the name.
    Created(Session),
    /// The name belonged to a live session, which is returned.
    Joined(Session),
    /// The name could not be claimed or joined right now.
    Conflict(SessionName),
}

impl Resolution {
    /// The resolved session with whether it was just created.
    ///
    /// # Errors
    ///
    /// - `Conflict` for [`Resolution::Conflict`]
    pub fn into_result(self) -> Result<(Session, bool), SessionError> {
        match self {
            Resolution::Created(session) => Ok((session, true)),
            Resolution::Joined(session) => Ok((session, false)),
            Resolution::Conflict(name) => Err(SessionError::conflict(name)),
        }
    }
}

/// Handler for create-or-join.
pub struct ResolveSessionHandler {
    registry: Arc<dyn SessionRegistry>,
    ttl: Duration,
}

impl ResolveSessionHandler {
    pub fn new(registry: Arc<dyn SessionRegistry>, ttl: Duration) -> Self {
        Self { registry, ttl }
    }

    pub async fn handle(&self, cmd: ResolveSessionCommand) -> Result<Resolution, SessionError> {
        let name = SessionName::new(&cmd.name)?;

        for attempt in 0..=MAX_RETRIES {
            let now = Timestamp::now();
            let candidate = Session::open(name.clone(), self.ttl, now);

            match self.registry.register(candidate).await? {
                Registration::Registered(session) => {
                    tracing::info!(
                        session = %session.name(),
                        session_id = %session.id(),
                        expires_at = %session.expires_at(),
                        "session created"
                    );
                    return Ok(Resolution::Created(session));
                }
                Registration::AlreadyExists => {}
            }

            if let Some(session) = self.registry.lookup(&name, now).await? {
                tracing::debug!(session = %session.name(), session_id = %session.id(), "session joined");
                return Ok(Resolution::Joined(session));
            }

            tracing::debug!(session = %name, attempt, "name taken without a live owner");
        }

        tracing::warn!(session = %name, "session name unavailable, awaiting sweep");
        Ok(Resolution::Conflict(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemorySessionRegistry;
    use crate::domain::foundation::{DomainError, SessionId};
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn handler(registry: Arc<dyn SessionRegistry>) -> ResolveSessionHandler {
        ResolveSessionHandler::new(registry, Duration::hours(24))
    }

    fn cmd(name: &str) -> ResolveSessionCommand {
        ResolveSessionCommand {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn fresh_name_is_created_then_joined() {
        let registry = Arc::new(InMemorySessionRegistry::new());
        let handler = handler(registry);

        let first = handler.handle(cmd("alpha")).await.unwrap();
        let second = handler.handle(cmd("alpha")).await.unwrap();

        let (created, was_created) = first.into_result().unwrap();
        let (joined, was_joined_created) = second.into_result().unwrap();
        assert!(was_created);
        assert!(!was_joined_created);
        assert_eq!(created.id(), joined.id());
    }

    #[tokio::test]
    async fn invalid_name_is_rejected() {
        let handler = handler(Arc::new(InMemorySessionRegistry::new()));

        let result = handler.handle(cmd("   ")).await;
        assert!(matches!(result, Err(SessionError::ValidationFailed { .. })));

        let result = handler.handle(cmd("a/b")).await;
        assert!(matches!(result, Err(SessionError::ValidationFailed { .. })));
    }

    #[tokio::test]
    async fn names_with_spaces_and_unicode_resolve() {
        let handler = handler(Arc::new(InMemorySessionRegistry::new()));

        for name in ["my notes", "caf\u{e9}", "Team Plan #1"] {
            let first = handler.handle(cmd(name)).await.unwrap();
            let second = handler.handle(cmd(name)).await.unwrap();

            match (first, second) {
                (Resolution::Created(a), Resolution::Joined(b)) => {
                    assert_eq!(a.name().as_str(), name);
                    assert_eq!(a.id(), b.id());
                }
                other => panic!("unexpected resolutions for {:?}: {:?}", name, other),
            }
        }
    }

    #[tokio::test]
    async fn padded_name_is_a_distinct_session() {
        let handler = handler(Arc::new(InMemorySessionRegistry::new()));

        let padded = handler.handle(cmd(" alpha")).await.unwrap();
        let plain = handler.handle(cmd("alpha")).await.unwrap();

        assert!(matches!(padded, Resolution::Created(_)));
        assert!(matches!(plain, Resolution::Created(_)));
    }

    #[tokio::test]
    async fn expired_unswept_name_conflicts() {
        let registry = Arc::new(InMemorySessionRegistry::new());
        let expired = Session::reconstitute(
            SessionId::new(),
            SessionName::new("alpha").unwrap(),
            Timestamp::now().minus_secs(120),
            Timestamp::now().minus_secs(60),
        );
        registry.register(expired).await.unwrap();

        let result = handler(registry).handle(cmd("alpha")).await.unwrap();

        assert!(matches!(result, Resolution::Conflict(ref name) if name.as_str() == "alpha"));
        assert!(matches!(
            result.into_result(),
            Err(SessionError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_resolves_share_one_session() {
        let registry: Arc<dyn SessionRegistry> = Arc::new(InMemorySessionRegistry::new());
        let handler = Arc::new(handler(registry));

        let tasks: Vec<_> = (0..32)
            .map(|_| {
                let handler = handler.clone();
                tokio::spawn(async move { handler.handle(cmd("beta")).await })
            })
            .collect();

        let mut created = 0;
        let mut ids = Vec::new();
        for task in tasks {
            match task.await.unwrap().unwrap() {
                Resolution::Created(session) => {
                    created += 1;
                    ids.push(*session.id());
                }
                Resolution::Joined(session) => ids.push(*session.id()),
                Resolution::Conflict(_) => panic!("unexpected conflict"),
            }
        }

        assert_eq!(created, 1);
        assert!(ids.iter().all(|id| *id == ids[0]));
    }

    /// Registry whose first registration loses a race to an entry that
    /// vanishes before the lookup.
    struct VanishingOwnerRegistry {
        inner: InMemorySessionRegistry,
        register_calls: Mutex<usize>,
    }

    #[async_trait]
    impl SessionRegistry for VanishingOwnerRegistry {
        async fn lookup(
            &self,
            name: &SessionName,
            now: Timestamp,
        ) -> Result<Option<Session>, DomainError> {
            self.inner.lookup(name, now).await
        }

        async fn register(&self, candidate: Session) -> Result<Registration, DomainError> {
            let call = {
                let mut calls = self.register_calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            if call == 1 {
                return Ok(Registration::AlreadyExists);
            }
            self.inner.register(candidate).await
        }

        async fn list_live(&self, now: Timestamp) -> Result<Vec<Session>, DomainError> {
            self.inner.list_live(now).await
        }

        async fn list_expired(&self, now: Timestamp) -> Result<Vec<Session>, DomainError> {
            self.inner.list_expired(now).await
        }

        async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
            self.inner.find_by_id(id).await
        }

        async fn remove(&self, session: &Session) -> Result<bool, DomainError> {
            self.inner.remove(session).await
        }
    }

    #[tokio::test]
    async fn retries_registration_once_when_owner_vanished() {
        let registry = Arc::new(VanishingOwnerRegistry {
            inner: InMemorySessionRegistry::new(),
            register_calls: Mutex::new(0),
        });

        let result = handler(registry.clone()).handle(cmd("gamma")).await.unwrap();

        assert!(matches!(result, Resolution::Created(_)));
        assert_eq!(*registry.register_calls.lock().unwrap(), 2);
    }

    struct FailingRegistry;

    #[async_trait]
    impl SessionRegistry for FailingRegistry {
        async fn lookup(&self, _: &SessionName, _: Timestamp) -> Result<Option<Session>, DomainError> {
            Err(DomainError::storage("registry down"))
        }
        async fn register(&self, _: Session) -> Result<Registration, DomainError> {
            Err(DomainError::storage("registry down"))
        }
        async fn list_live(&self, _: Timestamp) -> Result<Vec<Session>, DomainError> {
            Err(DomainError::storage("registry down"))
        }
        async fn list_expired(&self, _: Timestamp) -> Result<Vec<Session>, DomainError> {
            Err(DomainError::storage("registry down"))
        }
        async fn find_by_id(&self, _: &SessionId) -> Result<Option<Session>, DomainError> {
            Err(DomainError::storage("registry down"))
        }
        async fn remove(&self, _: &Session) -> Result<bool, DomainError> {
            Err(DomainError::storage("registry down"))
        }
    }

    #[tokio::test]
    async fn storage_failure_surfaces_as_infrastructure() {
        let result = handler(Arc::new(FailingRegistry)).handle(cmd("alpha")).await;
        assert!(matches!(result, Err(SessionError::Infrastructure(_))));
    }
}
