//! UpdateNoteHandler - Command handler for editing a note.
//!
//! Absent fields are left unchanged. Updates are not checked for emptiness:
//! a note may be edited down to no text at all.

use std::sync::Arc;

use crate::domain::content::{ContentError, Note, NoteChanges};
use crate::domain::foundation::NoteId;
use crate::ports::{ContentRepository, SessionRegistry};

use super::live_session;

#[derive(Debug, Clone)]
pub struct UpdateNoteCommand {
    pub session_name: String,
    pub note_id: NoteId,
    pub title: Option<String>,
    pub content: Option<String>,
}

pub struct UpdateNoteHandler {
    registry: Arc<dyn SessionRegistry>,
    content: Arc<dyn ContentRepository>,
}

impl UpdateNoteHandler {
    pub fn new(registry: Arc<dyn SessionRegistry>, content: Arc<dyn ContentRepository>) -> Self {
        Self { registry, content }
    }

    pub async fn handle(&self, cmd: UpdateNoteCommand) -> Result<Note, ContentError> {
        let session = live_session(self.registry.as_ref(), &cmd.session_name).await?;
        let changes = NoteChanges {
            title: cmd.title,
            content: cmd.content,
        };
        Ok(self
            .content
            .update_note(session.id(), cmd.note_id, changes)
            .await?)
    }
}
