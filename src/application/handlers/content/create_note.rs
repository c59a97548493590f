//! CreateNoteHandler - Command handler for adding a note to a session.

use std::sync::Arc;

use crate::domain::content::{ContentError, Note, NoteDraft};
use crate::ports::{ContentRepository, SessionRegistry};

use super::live_session;

/// Command to create a note.
#[derive(Debug, Clone)]
pub struct CreateNoteCommand {
    pub session_name: String,
    pub title: Option<String>,
    pub content: Option<String>,
}

pub struct CreateNoteHandler {
    registry: Arc<dyn SessionRegistry>,
    content: Arc<dyn ContentRepository>,
}

impl CreateNoteHandler {
    pub fn new(registry: Arc<dyn SessionRegistry>, content: Arc<dyn ContentRepository>) -> Self {
        Self { registry, content }
    }

    pub async fn handle(&self, cmd: CreateNoteCommand) -> Result<Note, ContentError> {
        let session = live_session(self.registry.as_ref(), &cmd.session_name).await?;
        let draft = NoteDraft::new(cmd.title, cmd.content)?;
        let note = self.content.create_note(session.id(), draft).await?;

        tracing::debug!(session = %session.name(), note_id = %note.id(), "note created");
        Ok(note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::content::test_support::Fixture;

    fn cmd(name: &str, title: Option<&str>, content: Option<&str>) -> CreateNoteCommand {
        CreateNoteCommand {
            session_name: name.to_string(),
            title: title.map(String::from),
            content: content.map(String::from),
        }
    }

    #[tokio::test]
    async fn creates_note_with_supplied_fields() {
        let fx = Fixture::new();
        let session = fx.live("alpha").await;
        let handler = CreateNoteHandler::new(fx.registry(), fx.content());

        let note = handler.handle(cmd("alpha", Some("hi"), Some(""))).await.unwrap();

        assert_eq!(note.title(), Some("hi"));
        assert_eq!(note.content(), Some(""));
        assert_eq!(note.created_at(), note.updated_at());
        assert_eq!(note.session_id(), session.id());
    }

    #[tokio::test]
    async fn rejects_note_without_text() {
        let fx = Fixture::new();
        fx.live("alpha").await;
        let handler = CreateNoteHandler::new(fx.registry(), fx.content());

        let result = handler.handle(cmd("alpha", Some(""), Some(""))).await;

        assert!(matches!(result, Err(ContentError::ValidationFailed { .. })));
    }

    #[tokio::test]
    async fn missing_session_wins_over_invalid_input() {
        let fx = Fixture::new();
        let handler = CreateNoteHandler::new(fx.registry(), fx.content());

        let result = handler.handle(cmd("ghost", None, None)).await;

        assert!(matches!(result, Err(ContentError::SessionNotFound(_))));
    }

    #[tokio::test]
    async fn expired_session_rejects_writes() {
        let fx = Fixture::new();
        fx.expired("alpha").await;
        let handler = CreateNoteHandler::new(fx.registry(), fx.content());

        let result = handler.handle(cmd("alpha", Some("late"), None)).await;

        assert!(matches!(result, Err(ContentError::SessionNotFound(_))));
        assert!(fx.content.session_ids().await.unwrap().is_empty());
    }
}
