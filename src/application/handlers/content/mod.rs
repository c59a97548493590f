//! Content command and query handlers.
//!
//! Every handler first resolves the session name to a live session through
//! the registry, then works on the repository under that session's id. A
//! missing, malformed or expired name is always `SessionNotFound`.

mod create_note;
mod delete_file;
mod delete_note;
mod download_file;
mod export_active_files;
mod get_note;
mod get_session_content;
mod update_note;
mod upload_file;

pub use create_note::{CreateNoteCommand, CreateNoteHandler};
pub use delete_file::{DeleteFileCommand, DeleteFileHandler};
pub use delete_note::{DeleteNoteCommand, DeleteNoteHandler};
pub use download_file::{DownloadFileHandler, DownloadFileQuery};
pub use export_active_files::{ExportActiveFilesHandler, FileArchive};
pub use get_note::{GetNoteHandler, GetNoteQuery};
pub use get_session_content::{GetSessionContentHandler, GetSessionContentQuery, SessionContentView};
pub use update_note::{UpdateNoteCommand, UpdateNoteHandler};
pub use upload_file::{UploadFileCommand, UploadFileHandler};

use crate::domain::content::ContentError;
use crate::domain::foundation::Timestamp;
use crate::domain::session::{Session, SessionName};
use crate::ports::SessionRegistry;

/// Resolve `raw_name` to the session that is live right now.
async fn live_session(
    registry: &dyn SessionRegistry,
    raw_name: &str,
) -> Result<Session, ContentError> {
    let name =
        SessionName::new(raw_name).map_err(|_| ContentError::session_not_found(raw_name))?;

    registry
        .lookup(&name, Timestamp::now())
        .await?
        .ok_or_else(|| ContentError::session_not_found(name.as_str()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::adapters::memory::{InMemoryContentRepository, InMemorySessionRegistry};
    use crate::domain::foundation::{SessionId, Timestamp};
    use crate::domain::session::{Session, SessionName};
    use crate::ports::{ContentRepository, SessionRegistry};

    /// In-memory registry and repository shared by handler tests.
    pub struct Fixture {
        pub registry: Arc<InMemorySessionRegistry>,
        pub content: Arc<InMemoryContentRepository>,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                registry: Arc::new(InMemorySessionRegistry::new()),
                content: Arc::new(InMemoryContentRepository::new()),
            }
        }

        pub fn registry(&self) -> Arc<dyn SessionRegistry> {
            self.registry.clone()
        }

        pub fn content(&self) -> Arc<dyn ContentRepository> {
            self.content.clone()
        }

        /// Register a session that lives for an hour.
        pub async fn live(&self, name: &str) -> Session {
            let session = Session::open(
                SessionName::new(name).unwrap(),
                chrono::Duration::hours(1),
                Timestamp::now(),
            );
            self.registry.register(session.clone()).await.unwrap();
            session
        }

        /// Register a session whose deadline has already passed.
        pub async fn expired(&self, name: &str) -> Session {
            let now = Timestamp::now();
            let session = Session::reconstitute(
                SessionId::new(),
                SessionName::new(name).unwrap(),
                now.minus_secs(120),
                now.minus_secs(60),
            );
            self.registry.register(session.clone()).await.unwrap();
            session
        }
    }
}
