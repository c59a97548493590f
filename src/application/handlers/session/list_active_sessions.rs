//! ListActiveSessionsHandler - Query handler for the live session index.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionRegistry;

/// Handler listing every live session, oldest first.
pub struct ListActiveSessionsHandler {
    registry: Arc<dyn SessionRegistry>,
}

impl ListActiveSessionsHandler {
    pub fn new(registry: Arc<dyn SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self) -> Result<Vec<Session>, SessionError> {
        Ok(self.registry.list_live(Timestamp::now()).await?)
    }
}
