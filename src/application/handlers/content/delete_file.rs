//! DeleteFileHandler - Command handler for removing a file.

use std::sync::Arc;

use crate::domain::content::ContentError;
use crate::domain::foundation::FileId;
use crate::ports::{ContentRepository, SessionRegistry};

use super::live_session;

#[derive(Debug, Clone)]
pub struct DeleteFileCommand {
    pub session_name: String,
    pub file_id: FileId,
}

pub struct DeleteFileHandler {
    registry: Arc<dyn SessionRegistry>,
    content: Arc<dyn ContentRepository>,
}

impl DeleteFileHandler {
    pub fn new(registry: Arc<dyn SessionRegistry>, content: Arc<dyn ContentRepository>) -> Self {
        Self { registry, content }
    }

    pub async fn handle(&self, cmd: DeleteFileCommand) -> Result<(), ContentError> {
        let session = live_session(self.registry.as_ref(), &cmd.session_name).await?;
        self.content.delete_file(session.id(), cmd.file_id).await?;

        tracing::debug!(session = %session.name(), file_id = %cmd.file_id, "file deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::content::test_support::Fixture;
    use crate::domain::content::FileUpload;

    #[tokio::test]
    async fn delete_then_delete_again_fails() {
        let fx = Fixture::new();
        let session = fx.live("alpha").await;
        let meta = fx
            .content
            .store_file(session.id(), FileUpload::new("a.txt", None, b"abc".to_vec()).unwrap())
            .await
            .unwrap();
        let handler = DeleteFileHandler::new(fx.registry(), fx.content());
        let cmd = DeleteFileCommand {
            session_name: "alpha".into(),
            file_id: meta.id(),
        };

        handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await;

        assert_eq!(second.unwrap_err(), ContentError::FileNotFound(meta.id()));
        assert!(fx.content.list_content(session.id()).await.unwrap().files.is_empty());
    }
}
