//! Note entity and its input value objects.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{NoteId, SessionId, Timestamp, ValidationError};

/// Validated input for a new note.
///
/// At least one of title/content must contain non-whitespace text. Values are
/// stored exactly as supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    title: Option<String>,
    content: Option<String>,
}

impl NoteDraft {
    pub fn new(title: Option<String>, content: Option<String>) -> Result<Self, ValidationError> {
        if is_blank(title.as_deref()) && is_blank(content.as_deref()) {
            return Err(ValidationError::empty_field("title"));
        }
        Ok(Self { title, content })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Partial update of a note. `None` leaves the field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// A short text note owned by one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    id: NoteId,
    session_id: SessionId,
    title: Option<String>,
    content: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Note {
    /// Materialize a draft under an allocated id.
    pub fn create(id: NoteId, session_id: SessionId, draft: NoteDraft, now: Timestamp) -> Self {
        Self {
            id,
            session_id,
            title: draft.title,
            content: draft.content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute a note from persistence (no validation).
    pub fn reconstitute(
        id: NoteId,
        session_id: SessionId,
        title: Option<String>,
        content: Option<String>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            session_id,
            title,
            content,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Replace the supplied fields and bump `updated_at`.
    ///
    /// `updated_at` always moves strictly forward, even when the clock has
    /// not advanced since the previous write.
    pub fn apply(&mut self, changes: NoteChanges, now: Timestamp) {
        if let Some(title) = changes.title {
            self.title = Some(title);
        }
        if let Some(content) = changes.content {
            self.content = Some(content);
        }
        self.updated_at = if now.is_after(&self.updated_at) {
            now
        } else {
            self.updated_at.next_tick()
        };
    }
}
