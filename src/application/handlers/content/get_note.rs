//! GetNoteHandler - Query handler for a single note.

use std::sync::Arc;

use crate::domain::content::{ContentError, Note};
use crate::domain::foundation::NoteId;
use crate::ports::{ContentRepository, SessionRegistry};

use super::live_session;

#[derive(Debug, Clone)]
pub struct GetNoteQuery {
    pub session_name: String,
    pub note_id: NoteId,
}

pub struct GetNoteHandler {
    registry: Arc<dyn SessionRegistry>,
    content: Arc<dyn ContentRepository>,
}

impl GetNoteHandler {
    pub fn new(registry: Arc<dyn SessionRegistry>, content: Arc<dyn ContentRepository>) -> Self {
        Self { registry, content }
    }

    pub async fn handle(&self, query: GetNoteQuery) -> Result<Note, ContentError> {
        let session = live_session(self.registry.as_ref(), &query.session_name).await?;
        Ok(self.content.find_note(session.id(), query.note_id).await?)
    }
}
