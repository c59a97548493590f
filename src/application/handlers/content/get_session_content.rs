//! GetSessionContentHandler - Query handler for everything a session holds.

use std::sync::Arc;

use crate::domain::content::{ContentError, SessionContent};
use crate::domain::session::Session;
use crate::ports::{ContentRepository, SessionRegistry};

use super::live_session;

/// Query for a session's notes and file metadata.
#[derive(Debug, Clone)]
pub struct GetSessionContentQuery {
    pub session_name: String,
}

/// The live session together with its content.
#[derive(Debug, Clone)]
pub struct SessionContentView {
    pub session: Session,
    pub content: SessionContent,
}

pub struct GetSessionContentHandler {
    registry: Arc<dyn SessionRegistry>,
    content: Arc<dyn ContentRepository>,
}

impl GetSessionContentHandler {
    pub fn new(registry: Arc<dyn SessionRegistry>, content: Arc<dyn ContentRepository>) -> Self {
        Self { registry, content }
    }

    pub async fn handle(
        &self,
        query: GetSessionContentQuery,
    ) -> Result<SessionContentView, ContentError> {
        let session = live_session(self.registry.as_ref(), &query.session_name).await?;
        let content = self.content.list_content(session.id()).await?;
        Ok(SessionContentView { session, content })
    }
}
