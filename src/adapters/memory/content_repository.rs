//! In-Memory Content Repository Adapter
//!
//! Stores notes and files per session in memory.
//! Used by the default deployment and by tests.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::domain::content::{
    FileMetadata, FileUpload, Note, NoteChanges, NoteDraft, SessionContent, StoredFile,
};
use crate::domain::foundation::{FileId, NoteId, SessionId, Timestamp};
use crate::ports::{ContentRepository, ContentRepositoryError, PurgeSummary};

/// Everything one session owns.
#[derive(Debug, Default)]
struct SessionBucket {
    notes: BTreeMap<NoteId, Note>,
    files: BTreeMap<FileId, StoredFile>,
}

impl SessionBucket {
    fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.files.is_empty()
    }
}

/// In-memory storage for session content.
///
/// Each session's bucket is locked on its own shard, so work on one session
/// never waits on another. Ids come from process-wide sequences, so they are
/// unique across sessions and never reused.
#[derive(Debug, Clone)]
pub struct InMemoryContentRepository {
    buckets: Arc<DashMap<SessionId, SessionBucket>>,
    note_seq: Arc<AtomicI64>,
    file_seq: Arc<AtomicI64>,
}

impl InMemoryContentRepository {
    pub fn new() -> Self {
        Self {
            buckets: Arc::new(DashMap::new()),
            note_seq: Arc::new(AtomicI64::new(0)),
            file_seq: Arc::new(AtomicI64::new(0)),
        }
    }

    /// Number of sessions currently holding content.
    pub fn session_count(&self) -> usize {
        self.buckets.len()
    }

    fn next_note_id(&self) -> NoteId {
        NoteId::new(self.note_seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn next_file_id(&self) -> FileId {
        FileId::new(self.file_seq.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Drop the bucket if the last item in it was just removed.
    fn release_if_empty(&self, session: &SessionId) {
        self.buckets.remove_if(session, |_, bucket| bucket.is_empty());
    }
}

impl Default for InMemoryContentRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepository {
    async fn create_note(
        &self,
        session: &SessionId,
        draft: NoteDraft,
    ) -> Result<Note, ContentRepositoryError> {
        let mut bucket = self.buckets.entry(*session).or_default();
        let note = Note::create(self.next_note_id(), *session, draft, Timestamp::now());
        bucket.notes.insert(note.id(), note.clone());
        Ok(note)
    }

    async fn find_note(
        &self,
        session: &SessionId,
        note_id: NoteId,
    ) -> Result<Note, ContentRepositoryError> {
        self.buckets
            .get(session)
            .and_then(|bucket| bucket.notes.get(&note_id).cloned())
            .ok_or(ContentRepositoryError::NoteNotFound(note_id))
    }

    async fn update_note(
        &self,
        session: &SessionId,
        note_id: NoteId,
        changes: NoteChanges,
    ) -> Result<Note, ContentRepositoryError> {
        let mut bucket = self
            .buckets
            .get_mut(session)
            .ok_or(ContentRepositoryError::NoteNotFound(note_id))?;
        let note = bucket
            .notes
            .get_mut(&note_id)
            .ok_or(ContentRepositoryError::NoteNotFound(note_id))?;
        note.apply(changes, Timestamp::now());
        Ok(note.clone())
    }

    async fn delete_note(
        &self,
        session: &SessionId,
        note_id: NoteId,
    ) -> Result<(), ContentRepositoryError> {
        {
            let mut bucket = self
                .buckets
                .get_mut(session)
                .ok_or(ContentRepositoryError::NoteNotFound(note_id))?;
            bucket
                .notes
                .remove(&note_id)
                .ok_or(ContentRepositoryError::NoteNotFound(note_id))?;
        }
        self.release_if_empty(session);
        Ok(())
    }

    async fn list_content(
        &self,
        session: &SessionId,
    ) -> Result<SessionContent, ContentRepositoryError> {
        Ok(self
            .buckets
            .get(session)
            .map(|bucket| SessionContent {
                notes: bucket.notes.values().cloned().collect(),
                files: bucket
                    .files
                    .values()
                    .map(|file| file.metadata().clone())
                    .collect(),
            })
            .unwrap_or_default())
    }

    async fn store_file(
        &self,
        session: &SessionId,
        upload: FileUpload,
    ) -> Result<FileMetadata, ContentRepositoryError> {
        let mut bucket = self.buckets.entry(*session).or_default();
        let file = StoredFile::create(self.next_file_id(), *session, upload, Timestamp::now());
        let metadata = file.metadata().clone();
        bucket.files.insert(metadata.id(), file);
        Ok(metadata)
    }

    async fn read_file(
        &self,
        session: &SessionId,
        file_id: FileId,
    ) -> Result<StoredFile, ContentRepositoryError> {
        self.buckets
            .get(session)
            .and_then(|bucket| bucket.files.get(&file_id).cloned())
            .ok_or(ContentRepositoryError::FileNotFound(file_id))
    }

    async fn delete_file(
        &self,
        session: &SessionId,
        file_id: FileId,
    ) -> Result<(), ContentRepositoryError> {
        {
            let mut bucket = self
                .buckets
                .get_mut(session)
                .ok_or(ContentRepositoryError::FileNotFound(file_id))?;
            bucket
                .files
                .remove(&file_id)
                .ok_or(ContentRepositoryError::FileNotFound(file_id))?;
        }
        self.release_if_empty(session);
        Ok(())
    }

    async fn purge_session(
        &self,
        session: &SessionId,
    ) -> Result<PurgeSummary, ContentRepositoryError> {
        Ok(self
            .buckets
            .remove(session)
            .map(|(_, bucket)| PurgeSummary {
                notes: bucket.notes.len(),
                files: bucket.files.len(),
            })
            .unwrap_or_default())
    }

    async fn session_ids(&self) -> Result<Vec<SessionId>, ContentRepositoryError> {
        Ok(self.buckets.iter().map(|entry| *entry.key()).collect())
    }
}
