//! PostgreSQL implementation of ContentRepository.
//!
//! Notes and files live in their own tables keyed by `session_id`. File
//! bytes are stored inline as `BYTEA`.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::content::{
    FileMetadata, FileUpload, Note, NoteChanges, NoteDraft, SessionContent, StoredFile,
};
use crate::domain::foundation::{FileId, NoteId, SessionId, Timestamp};
use crate::ports::{ContentRepository, ContentRepositoryError, PurgeSummary};

/// PostgreSQL implementation of ContentRepository.
#[derive(Clone)]
pub struct PostgresContentRepository {
    pool: PgPool,
}

impl PostgresContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Must be the first statement of a transaction.
const SNAPSHOT_ISOLATION: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY";

fn storage(context: &'static str) -> impl Fn(sqlx::Error) -> ContentRepositoryError {
    move |e| ContentRepositoryError::Storage(format!("{}: {}", context, e))
}

#[async_trait]
impl ContentRepository for PostgresContentRepository {
    async fn create_note(
        &self,
        session: &SessionId,
        draft: NoteDraft,
    ) -> Result<Note, ContentRepositoryError> {
        let now = Timestamp::now();
        let row = sqlx::query(
            r#"
            INSERT INTO notes (session_id, title, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING id
            "#,
        )
        .bind(session.as_uuid())
        .bind(draft.title())
        .bind(draft.content())
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(storage("Failed to insert note"))?;

        let id: i64 = row.try_get("id").map_err(storage("Failed to get id"))?;
        Ok(Note::create(NoteId::new(id), *session, draft, now))
    }

    async fn find_note(
        &self,
        session: &SessionId,
        note_id: NoteId,
    ) -> Result<Note, ContentRepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, session_id, title, content, created_at, updated_at
            FROM notes
            WHERE id = $1 AND session_id = $2
            "#,
        )
        .bind(note_id.value())
        .bind(session.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage("Failed to fetch note"))?;

        match row {
            Some(row) => row_to_note(row),
            None => Err(ContentRepositoryError::NoteNotFound(note_id)),
        }
    }

    async fn update_note(
        &self,
        session: &SessionId,
        note_id: NoteId,
        changes: NoteChanges,
    ) -> Result<Note, ContentRepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage("Failed to begin transaction"))?;

        let row = sqlx::query(
            r#"
            SELECT id, session_id, title, content, created_at, updated_at
            FROM notes
            WHERE id = $1 AND session_id = $2
            FOR UPDATE
            "#,
        )
        .bind(note_id.value())
        .bind(session.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage("Failed to lock note"))?
        .ok_or(ContentRepositoryError::NoteNotFound(note_id))?;

        let mut note = row_to_note(row)?;
        note.apply(changes, Timestamp::now());

        sqlx::query(
            r#"
            UPDATE notes SET title = $3, content = $4, updated_at = $5
            WHERE id = $1 AND session_id = $2
            "#,
        )
        .bind(note_id.value())
        .bind(session.as_uuid())
        .bind(note.title())
        .bind(note.content())
        .bind(note.updated_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(storage("Failed to update note"))?;

        tx.commit()
            .await
            .map_err(storage("Failed to commit note update"))?;

        Ok(note)
    }

    async fn delete_note(
        &self,
        session: &SessionId,
        note_id: NoteId,
    ) -> Result<(), ContentRepositoryError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND session_id = $2")
            .bind(note_id.value())
            .bind(session.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage("Failed to delete note"))?;

        if result.rows_affected() == 0 {
            return Err(ContentRepositoryError::NoteNotFound(note_id));
        }
        Ok(())
    }

    async fn list_content(
        &self,
        session: &SessionId,
    ) -> Result<SessionContent, ContentRepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage("Failed to begin transaction"))?;

        // Both reads see one snapshot so a concurrent purge is all or nothing.
        sqlx::query(SNAPSHOT_ISOLATION)
            .execute(&mut *tx)
            .await
            .map_err(storage("Failed to set isolation level"))?;

        let note_rows = sqlx::query(
            r#"
            SELECT id, session_id, title, content, created_at, updated_at
            FROM notes
            WHERE session_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(session.as_uuid())
        .fetch_all(&mut *tx)
        .await
        .map_err(storage("Failed to list notes"))?;

        let file_rows = sqlx::query(
            r#"
            SELECT id, session_id, filename, mimetype, size, checksum, created_at
            FROM files
            WHERE session_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(session.as_uuid())
        .fetch_all(&mut *tx)
        .await
        .map_err(storage("Failed to list files"))?;

        tx.commit()
            .await
            .map_err(storage("Failed to commit content listing"))?;

        Ok(SessionContent {
            notes: note_rows
                .into_iter()
                .map(row_to_note)
                .collect::<Result<_, _>>()?,
            files: file_rows
                .iter()
                .map(row_to_metadata)
                .collect::<Result<_, _>>()?,
        })
    }

    async fn store_file(
        &self,
        session: &SessionId,
        upload: FileUpload,
    ) -> Result<FileMetadata, ContentRepositoryError> {
        let now = Timestamp::now();
        let size = i64::try_from(upload.size())
            .map_err(|_| ContentRepositoryError::Storage("File too large to store".into()))?;

        let row = sqlx::query(
            r#"
            INSERT INTO files (session_id, filename, mimetype, size, checksum, content, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(session.as_uuid())
        .bind(upload.filename())
        .bind(upload.mimetype())
        .bind(size)
        .bind(upload.checksum())
        .bind(upload.content())
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(storage("Failed to insert file"))?;

        let id: i64 = row.try_get("id").map_err(storage("Failed to get id"))?;
        let stored = StoredFile::create(FileId::new(id), *session, upload, now);
        Ok(stored.metadata().clone())
    }

    async fn read_file(
        &self,
        session: &SessionId,
        file_id: FileId,
    ) -> Result<StoredFile, ContentRepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, session_id, filename, mimetype, size, checksum, content, created_at
            FROM files
            WHERE id = $1 AND session_id = $2
            "#,
        )
        .bind(file_id.value())
        .bind(session.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage("Failed to fetch file"))?
        .ok_or(ContentRepositoryError::FileNotFound(file_id))?;

        let metadata = row_to_metadata(&row)?;
        let content: Vec<u8> = row
            .try_get("content")
            .map_err(storage("Failed to get content"))?;
        Ok(StoredFile::from_parts(metadata, content))
    }

    async fn delete_file(
        &self,
        session: &SessionId,
        file_id: FileId,
    ) -> Result<(), ContentRepositoryError> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1 AND session_id = $2")
            .bind(file_id.value())
            .bind(session.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage("Failed to delete file"))?;

        if result.rows_affected() == 0 {
            return Err(ContentRepositoryError::FileNotFound(file_id));
        }
        Ok(())
    }

    async fn purge_session(
        &self,
        session: &SessionId,
    ) -> Result<PurgeSummary, ContentRepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage("Failed to begin transaction"))?;

        let notes = sqlx::query("DELETE FROM notes WHERE session_id = $1")
            .bind(session.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(storage("Failed to purge notes"))?;

        let files = sqlx::query("DELETE FROM files WHERE session_id = $1")
            .bind(session.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(storage("Failed to purge files"))?;

        tx.commit().await.map_err(storage("Failed to commit purge"))?;

        Ok(PurgeSummary {
            notes: notes.rows_affected() as usize,
            files: files.rows_affected() as usize,
        })
    }

    async fn session_ids(&self) -> Result<Vec<SessionId>, ContentRepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT session_id FROM notes
            UNION
            SELECT session_id FROM files
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage("Failed to list content owners"))?;

        rows.iter()
            .map(|row| {
                row.try_get::<uuid::Uuid, _>("session_id")
                    .map(SessionId::from_uuid)
                    .map_err(storage("Failed to get session_id"))
            })
            .collect()
    }
}

fn row_to_note(row: sqlx::postgres::PgRow) -> Result<Note, ContentRepositoryError> {
    let id: i64 = row.try_get("id").map_err(storage("Failed to get id"))?;
    let session_id: uuid::Uuid = row
        .try_get("session_id")
        .map_err(storage("Failed to get session_id"))?;
    let title: Option<String> = row.try_get("title").map_err(storage("Failed to get title"))?;
    let content: Option<String> = row
        .try_get("content")
        .map_err(storage("Failed to get content"))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(storage("Failed to get created_at"))?;
    let updated_at: chrono::DateTime<chrono::Utc> = row
        .try_get("updated_at")
        .map_err(storage("Failed to get updated_at"))?;

    Ok(Note::reconstitute(
        NoteId::new(id),
        SessionId::from_uuid(session_id),
        title,
        content,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

fn row_to_metadata(row: &sqlx::postgres::PgRow) -> Result<FileMetadata, ContentRepositoryError> {
    let id: i64 = row.try_get("id").map_err(storage("Failed to get id"))?;
    let session_id: uuid::Uuid = row
        .try_get("session_id")
        .map_err(storage("Failed to get session_id"))?;
    let filename: String = row
        .try_get("filename")
        .map_err(storage("Failed to get filename"))?;
    let mimetype: Option<String> = row
        .try_get("mimetype")
        .map_err(storage("Failed to get mimetype"))?;
    let size: i64 = row.try_get("size").map_err(storage("Failed to get size"))?;
    let checksum: String = row
        .try_get("checksum")
        .map_err(storage("Failed to get checksum"))?;
    let created_at: chrono::DateTime<chrono::Utc> = row
        .try_get("created_at")
        .map_err(storage("Failed to get created_at"))?;

    Ok(FileMetadata::reconstitute(
        FileId::new(id),
        SessionId::from_uuid(session_id),
        filename,
        mimetype,
        size.max(0) as u64,
        checksum,
        Timestamp::from_datetime(created_at),
    ))
}
