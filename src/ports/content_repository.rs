//! Content repository port.
//!
//! Stores notes and files keyed by the owning session. Callers must have
//! verified the session is live; the repository does not re-check expiry.

use async_trait::async_trait;

use crate::domain::content::{
    FileMetadata, FileUpload, Note, NoteChanges, NoteDraft, SessionContent, StoredFile,
};
use crate::domain::foundation::{FileId, NoteId, SessionId};

/// Errors raised by content repositories.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentRepositoryError {
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),

    #[error("File not found: {0}")]
    FileNotFound(FileId),

    #[error("Storage failure: {0}")]
    Storage(String),
}

/// What a purge removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgeSummary {
    pub notes: usize,
    pub files: usize,
}

#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Store a new note and allocate its id.
    async fn create_note(
        &self,
        session: &SessionId,
        draft: NoteDraft,
    ) -> Result<Note, ContentRepositoryError>;

    /// Fetch one note of the session.
    ///
    /// # Errors
    ///
    /// - `NoteNotFound` if the note does not exist or belongs elsewhere
    async fn find_note(
        &self,
        session: &SessionId,
        note_id: NoteId,
    ) -> Result<Note, ContentRepositoryError>;

    /// Apply changes to a note, bumping `updated_at`.
    async fn update_note(
        &self,
        session: &SessionId,
        note_id: NoteId,
        changes: NoteChanges,
    ) -> Result<Note, ContentRepositoryError>;

    /// Delete a note. Deleting an absent note is an error, not a no-op.
    async fn delete_note(
        &self,
        session: &SessionId,
        note_id: NoteId,
    ) -> Result<(), ContentRepositoryError>;

    /// Notes and file metadata of the session, oldest first.
    async fn list_content(&self, session: &SessionId)
        -> Result<SessionContent, ContentRepositoryError>;

    /// Store a file and allocate its id.
    async fn store_file(
        &self,
        session: &SessionId,
        upload: FileUpload,
    ) -> Result<FileMetadata, ContentRepositoryError>;

    /// Read a file with its exact bytes.
    async fn read_file(
        &self,
        session: &SessionId,
        file_id: FileId,
    ) -> Result<StoredFile, ContentRepositoryError>;

    /// Delete a file. Deleting an absent file is an error, not a no-op.
    async fn delete_file(
        &self,
        session: &SessionId,
        file_id: FileId,
    ) -> Result<(), ContentRepositoryError>;

    /// Remove every note and file of the session in one atomic step.
    async fn purge_session(&self, session: &SessionId)
        -> Result<PurgeSummary, ContentRepositoryError>;

    /// Sessions that currently own at least one note or file.
    async fn session_ids(&self) -> Result<Vec<SessionId>, ContentRepositoryError>;
}
