//! In-memory session registry backed by a [`DashMap`].
//!
//! Entries are keyed by session name. The shard lock taken by the entry API
//! makes `register` atomic per name, so concurrent claims on an unused name
//! have exactly one winner. A second map from id to name keeps `find_by_id`
//! a point lookup.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::foundation::{DomainError, SessionId, Timestamp};
use crate::domain::session::{Session, SessionName};
use crate::ports::{Registration, SessionRegistry};

/// In-memory [`SessionRegistry`].
#[derive(Debug, Default)]
pub struct InMemorySessionRegistry {
    sessions: DashMap<String, Session>,
    names_by_id: DashMap<SessionId, String>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn collect_sorted(&self, keep: impl Fn(&Session) -> bool) -> Vec<Session> {
        let mut sessions: Vec<Session> = self
            .sessions
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        sessions.sort_by(|a, b| {
            a.created_at()
                .cmp(b.created_at())
                .then_with(|| a.name().as_str().cmp(b.name().as_str()))
        });
        sessions
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn lookup(
        &self,
        name: &SessionName,
        now: Timestamp,
    ) -> Result<Option<Session>, DomainError> {
        Ok(self
            .sessions
            .get(name.as_str())
            .filter(|entry| entry.is_live_at(&now))
            .map(|entry| entry.value().clone()))
    }

    async fn register(&self, candidate: Session) -> Result<Registration, DomainError> {
        match self.sessions.entry(candidate.name().as_str().to_owned()) {
            Entry::Occupied(_) => Ok(Registration::AlreadyExists),
            Entry::Vacant(vacant) => {
                self.names_by_id
                    .insert(*candidate.id(), candidate.name().as_str().to_owned());
                vacant.insert(candidate.clone());
                Ok(Registration::Registered(candidate))
            }
        }
    }

    async fn list_live(&self, now: Timestamp) -> Result<Vec<Session>, DomainError> {
        Ok(self.collect_sorted(|s| s.is_live_at(&now)))
    }

    async fn list_expired(&self, now: Timestamp) -> Result<Vec<Session>, DomainError> {
        Ok(self.collect_sorted(|s| s.is_expired_at(&now)))
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let Some(name) = self.names_by_id.get(id).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };
        Ok(self
            .sessions
            .get(&name)
            .filter(|entry| entry.id() == id)
            .map(|entry| entry.value().clone()))
    }

    async fn remove(&self, session: &Session) -> Result<bool, DomainError> {
        let removed = self
            .sessions
            .remove_if(session.name().as_str(), |_, current| {
                current.id() == session.id()
            })
            .is_some();
        if removed {
            self.names_by_id.remove(session.id());
        }
        Ok(removed)
    }
}
