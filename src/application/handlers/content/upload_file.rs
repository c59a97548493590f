//! UploadFileHandler - Command handler for storing a file in a session.

use std::sync::Arc;

use crate::domain::content::{ContentError, FileMetadata, FileUpload};
use crate::ports::{ContentRepository, SessionRegistry};

use super::live_session;

/// Command to upload a file.
#[derive(Debug, Clone)]
pub struct UploadFileCommand {
    pub session_name: String,
    pub filename: String,
    /// MIME type declared by the client, if any.
    pub mimetype: Option<String>,
    pub content: Vec<u8>,
}

pub struct UploadFileHandler {
    registry: Arc<dyn SessionRegistry>,
    content: Arc<dyn ContentRepository>,
}

impl UploadFileHandler {
    pub fn new(registry: Arc<dyn SessionRegistry>, content: Arc<dyn ContentRepository>) -> Self {
        Self { registry, content }
    }

    pub async fn handle(&self, cmd: UploadFileCommand) -> Result<FileMetadata, ContentError> {
        let session = live_session(self.registry.as_ref(), &cmd.session_name).await?;
        let upload = FileUpload::new(&cmd.filename, cmd.mimetype, cmd.content)?;
        let metadata = self.content.store_file(session.id(), upload).await?;

        tracing::debug!(
            session = %session.name(),
            file_id = %metadata.id(),
            size = metadata.size(),
            "file stored"
        );
        Ok(metadata)
    }
}
