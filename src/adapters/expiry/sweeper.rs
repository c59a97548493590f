//! ExpirySweeper - Background service that evicts expired sessions.
//!
//! Each pass:
//! 1. Lists registry entries whose deadline has passed
//! 2. Purges each session's notes and files
//! 3. Removes the registry entry, freeing the name for reuse
//! 4. Purges orphaned content whose owner is no longer registered
//!
//! A session whose purge fails keeps its registry entry and is retried on the
//! next pass, so content never outlives the entry that points at it.
//!
//! ## Graceful Shutdown
//!
//! The loop listens on a `watch` channel and exits after the pass in progress.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::session::Session;
use crate::ports::{ContentRepository, SessionRegistry};

/// Configuration for the ExpirySweeper service.
#[derive(Debug, Clone)]
pub struct ExpirySweeperConfig {
    /// Pause between passes.
    pub interval: Duration,
}

impl Default for ExpirySweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
        }
    }
}

impl ExpirySweeperConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// What one sweep pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub sessions_removed: usize,
    pub notes_removed: usize,
    pub files_removed: usize,
    pub orphans_reclaimed: usize,
    pub failures: usize,
}

impl SweepReport {
    pub fn is_idle(&self) -> bool {
        *self == SweepReport::default()
    }
}

/// Background service that removes expired sessions with their content.
pub struct ExpirySweeper {
    registry: Arc<dyn SessionRegistry>,
    content: Arc<dyn ContentRepository>,
    config: ExpirySweeperConfig,
}

impl ExpirySweeper {
    pub fn new(registry: Arc<dyn SessionRegistry>, content: Arc<dyn ContentRepository>) -> Self {
        Self::with_config(registry, content, ExpirySweeperConfig::default())
    }

    pub fn with_config(
        registry: Arc<dyn SessionRegistry>,
        content: Arc<dyn ContentRepository>,
        config: ExpirySweeperConfig,
    ) -> Self {
        Self {
            registry,
            content,
            config,
        }
    }

    /// Run the sweep loop until the shutdown signal is received.
    ///
    /// A failed pass is logged and does not stop the loop.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.interval);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

        tracing::info!(interval_secs = self.config.interval.as_secs(), "expiry sweeper started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("expiry sweeper stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    if let Err(e) = self.sweep_at(Timestamp::now()).await {
                        tracing::warn!(error = %e, "sweep pass failed");
                    }
                }
            }
        }
    }

    /// Run one pass treating `now` as the current time.
    ///
    /// # Errors
    ///
    /// Fails only when the registry or repository cannot be listed.
    /// Failures on individual sessions are counted in the report.
    pub async fn sweep_at(&self, now: Timestamp) -> Result<SweepReport, DomainError> {
        let mut report = SweepReport::default();

        for session in self.registry.list_expired(now).await? {
            self.evict(&session, &mut report).await;
        }

        self.reclaim_orphans(&mut report).await?;

        if report.is_idle() {
            tracing::debug!("sweep pass found nothing to do");
        } else {
            tracing::info!(
                sessions_removed = report.sessions_removed,
                notes_removed = report.notes_removed,
                files_removed = report.files_removed,
                orphans_reclaimed = report.orphans_reclaimed,
                failures = report.failures,
                "sweep pass completed"
            );
        }

        Ok(report)
    }

    async fn evict(&self, session: &Session, report: &mut SweepReport) {
        let summary = match self.content.purge_session(session.id()).await {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(
                    session = %session.name(),
                    session_id = %session.id(),
                    error = %e,
                    "purge failed, keeping session for the next pass"
                );
                report.failures += 1;
                return;
            }
        };
        report.notes_removed += summary.notes;
        report.files_removed += summary.files;

        match self.registry.remove(session).await {
            Ok(true) => {
                report.sessions_removed += 1;
                tracing::debug!(session = %session.name(), session_id = %session.id(), "session expired");
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(session = %session.name(), error = %e, "failed to remove expired session");
                report.failures += 1;
            }
        }
    }

    async fn reclaim_orphans(&self, report: &mut SweepReport) -> Result<(), DomainError> {
        let owners = self
            .content
            .session_ids()
            .await
            .map_err(|e| DomainError::storage(e.to_string()))?;

        for owner in owners {
            if self.registry.find_by_id(&owner).await?.is_some() {
                continue;
            }
            match self.content.purge_session(&owner).await {
                Ok(summary) => {
                    report.orphans_reclaimed += 1;
                    report.notes_removed += summary.notes;
                    report.files_removed += summary.files;
                }
                Err(e) => {
                    tracing::warn!(session_id = %owner, error = %e, "failed to reclaim orphaned content");
                    report.failures += 1;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryContentRepository, InMemorySessionRegistry};
    use crate::domain::content::{
        FileMetadata, FileUpload, Note, NoteChanges, NoteDraft, SessionContent, StoredFile,
    };
    use crate::domain::foundation::{FileId, NoteId, SessionId};
    use crate::domain::session::SessionName;
    use crate::ports::{ContentRepositoryError, PurgeSummary, Registration};
    use async_trait::async_trait;

    fn open(name: &str, ttl_secs: i64, now: Timestamp) -> Session {
        Session::open(
            SessionName::new(name).unwrap(),
            chrono::Duration::seconds(ttl_secs),
            now,
        )
    }

    fn draft() -> NoteDraft {
        NoteDraft::new(Some("hi".to_string()), None).unwrap()
    }

    fn setup() -> (
        Arc<InMemorySessionRegistry>,
        Arc<InMemoryContentRepository>,
        ExpirySweeper,
    ) {
        let registry = Arc::new(InMemorySessionRegistry::new());
        let content = Arc::new(InMemoryContentRepository::new());
        let sweeper = ExpirySweeper::new(registry.clone(), content.clone());
        (registry, content, sweeper)
    }

    #[tokio::test]
    async fn sweep_removes_expired_session_and_its_content() {
        let (registry, content, sweeper) = setup();
        let now = Timestamp::now();
        let session = open("alpha", 60, now);
        registry.register(session.clone()).await.unwrap();
        content.create_note(session.id(), draft()).await.unwrap();
        content
            .store_file(session.id(), FileUpload::new("a.txt", None, b"abc".to_vec()).unwrap())
            .await
            .unwrap();

        let report = sweeper.sweep_at(now.plus_secs(60)).await.unwrap();

        assert_eq!(
            report,
            SweepReport {
                sessions_removed: 1,
                notes_removed: 1,
                files_removed: 1,
                orphans_reclaimed: 0,
                failures: 0,
            }
        );
        assert!(registry.is_empty());
        assert!(content.list_content(session.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sweep_keeps_live_sessions() {
        let (registry, content, sweeper) = setup();
        let now = Timestamp::now();
        let session = open("alpha", 60, now);
        registry.register(session.clone()).await.unwrap();
        content.create_note(session.id(), draft()).await.unwrap();

        let report = sweeper.sweep_at(now.plus_secs(59)).await.unwrap();

        assert!(report.is_idle());
        assert_eq!(registry.len(), 1);
        assert_eq!(content.list_content(session.id()).await.unwrap().notes.len(), 1);
    }

    #[tokio::test]
    async fn name_is_reusable_after_sweep() {
        let (registry, _content, sweeper) = setup();
        let now = Timestamp::now();
        registry.register(open("alpha", 60, now)).await.unwrap();

        let later = now.plus_secs(61);
        assert_eq!(
            registry.register(open("alpha", 60, later)).await.unwrap(),
            Registration::AlreadyExists
        );

        sweeper.sweep_at(later).await.unwrap();

        let fresh = open("alpha", 60, later);
        assert_eq!(
            registry.register(fresh.clone()).await.unwrap(),
            Registration::Registered(fresh)
        );
    }

    #[tokio::test]
    async fn sweep_reclaims_orphaned_content() {
        let (_registry, content, sweeper) = setup();
        let orphan = SessionId::new();
        content.create_note(&orphan, draft()).await.unwrap();

        let report = sweeper.sweep_at(Timestamp::now()).await.unwrap();

        assert_eq!(report.orphans_reclaimed, 1);
        assert_eq!(report.notes_removed, 1);
        assert!(content.session_ids().await.unwrap().is_empty());
    }

    /// Content repository whose purge always fails
    struct FailingPurgeRepository {
        inner: InMemoryContentRepository,
    }

    #[async_trait]
    impl ContentRepository for FailingPurgeRepository {
        async fn create_note(
            &self,
            session: &SessionId,
            draft: NoteDraft,
        ) -> Result<Note, ContentRepositoryError> {
            self.inner.create_note(session, draft).await
        }

        async fn find_note(
            &self,
            session: &SessionId,
            note_id: NoteId,
        ) -> Result<Note, ContentRepositoryError> {
            self.inner.find_note(session, note_id).await
        }

        async fn update_note(
            &self,
            session: &SessionId,
            note_id: NoteId,
            changes: NoteChanges,
        ) -> Result<Note, ContentRepositoryError> {
            self.inner.update_note(session, note_id, changes).await
        }

        async fn delete_note(
            &self,
            session: &SessionId,
            note_id: NoteId,
        ) -> Result<(), ContentRepositoryError> {
            self.inner.delete_note(session, note_id).await
        }

        async fn list_content(
            &self,
            session: &SessionId,
        ) -> Result<SessionContent, ContentRepositoryError> {
            self.inner.list_content(session).await
        }

        async fn store_file(
            &self,
            session: &SessionId,
            upload: FileUpload,
        ) -> Result<FileMetadata, ContentRepositoryError> {
            self.inner.store_file(session, upload).await
        }

        async fn read_file(
            &self,
            session: &SessionId,
            file_id: FileId,
        ) -> Result<StoredFile, ContentRepositoryError> {
            self.inner.read_file(session, file_id).await
        }

        async fn delete_file(
            &self,
            session: &SessionId,
            file_id: FileId,
        ) -> Result<(), ContentRepositoryError> {
            self.inner.delete_file(session, file_id).await
        }

        async fn purge_session(
            &self,
            _session: &SessionId,
        ) -> Result<PurgeSummary, ContentRepositoryError> {
            Err(ContentRepositoryError::Storage("disk on fire".to_string()))
        }

        async fn session_ids(&self) -> Result<Vec<SessionId>, ContentRepositoryError> {
            self.inner.session_ids().await
        }
    }

    #[tokio::test]
    async fn failed_purge_keeps_registry_entry() {
        let registry = Arc::new(InMemorySessionRegistry::new());
        let content = Arc::new(FailingPurgeRepository {
            inner: InMemoryContentRepository::new(),
        });
        let sweeper = ExpirySweeper::new(registry.clone(), content.clone());

        let now = Timestamp::now();
        let session = open("alpha", 60, now);
        registry.register(session.clone()).await.unwrap();
        content.create_note(session.id(), draft()).await.unwrap();

        let report = sweeper.sweep_at(now.plus_secs(120)).await.unwrap();

        assert_eq!(report.failures, 1);
        assert_eq!(report.sessions_removed, 0);
        assert!(registry.find_by_id(session.id()).await.unwrap().is_some());
        assert_eq!(content.list_content(session.id()).await.unwrap().notes.len(), 1);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown_signal() {
        let registry = Arc::new(InMemorySessionRegistry::new());
        let expired = Session::reconstitute(
            SessionId::new(),
            SessionName::new("old").unwrap(),
            Timestamp::now().minus_secs(120),
            Timestamp::now().minus_secs(60),
        );
        registry.register(expired).await.unwrap();

        let sweeper = ExpirySweeper::with_config(
            registry.clone(),
            Arc::new(InMemoryContentRepository::new()),
            ExpirySweeperConfig::default().with_interval(Duration::from_millis(10)),
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move { sweeper.run(shutdown_rx).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        assert!(registry.is_empty());
    }

    #[test]
    fn config_defaults_to_five_minutes() {
        assert_eq!(ExpirySweeperConfig::default().interval, Duration::from_secs(300));
    }
}
