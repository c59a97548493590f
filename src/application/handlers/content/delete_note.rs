//! DeleteNoteHandler - Command handler for removing a note.

use std::sync::Arc;

use crate::domain::content::ContentError;
use crate::domain::foundation::NoteId;
use crate::ports::{ContentRepository, SessionRegistry};

use super::live_session;

#[derive(Debug, Clone)]
pub struct DeleteNoteCommand {
    pub session_name: String,
    pub note_id: NoteId,
}

pub struct DeleteNoteHandler {
    registry: Arc<dyn SessionRegistry>,
    content: Arc<dyn ContentRepository>,
}

impl DeleteNoteHandler {
    pub fn new(registry: Arc<dyn SessionRegistry>, content: Arc<dyn ContentRepository>) -> Self {
        Self { registry, content }
    }

    /// # Errors
    ///
    /// - `NoteNotFound` if the note is absent, including when it was
    ///   already deleted
    pub async fn handle(&self, cmd: DeleteNoteCommand) -> Result<(), ContentError> {
        let session = live_session(self.registry.as_ref(), &cmd.session_name).await?;
        self.content.delete_note(session.id(), cmd.note_id).await?;

        tracing::debug!(session = %session.name(), note_id = %cmd.note_id, "note deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::content::test_support::Fixture;
    use crate::domain::content::NoteDraft;

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let fx = Fixture::new();
        let session = fx.live("alpha").await;
        let note = fx
            .content
            .create_note(session.id(), NoteDraft::new(Some("hi".into()), None).unwrap())
            .await
            .unwrap();
        let handler = DeleteNoteHandler::new(fx.registry(), fx.content());
        let cmd = DeleteNoteCommand {
            session_name: "alpha".into(),
            note_id: note.id(),
        };

        handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await;

        assert_eq!(second.unwrap_err(), ContentError::NoteNotFound(note.id()));
    }
}
