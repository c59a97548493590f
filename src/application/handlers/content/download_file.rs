//! DownloadFileHandler - Query handler returning a file's exact bytes.

use std::sync::Arc;

use crate::domain::content::{ContentError, StoredFile};
use crate::domain::foundation::FileId;
use crate::ports::{ContentRepository, SessionRegistry};

use super::live_session;

#[derive(Debug, Clone)]
pub struct DownloadFileQuery {
    pub session_name: String,
    pub file_id: FileId,
}

pub struct DownloadFileHandler {
    registry: Arc<dyn SessionRegistry>,
    content: Arc<dyn ContentRepository>,
}

impl DownloadFileHandler {
    pub fn new(registry: Arc<dyn SessionRegistry>, content: Arc<dyn ContentRepository>) -> Self {
        Self { registry, content }
    }

    pub async fn handle(&self, query: DownloadFileQuery) -> Result<StoredFile, ContentError> {
        let session = live_session(self.registry.as_ref(), &query.session_name).await?;
        Ok(self.content.read_file(session.id(), query.file_id).await?)
    }
}
