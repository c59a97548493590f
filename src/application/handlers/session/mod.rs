//! Session command and query handlers.

mod list_active_sessions;
mod resolve_session;

pub use list_active_sessions::ListActiveSessionsHandler;
pub use resolve_session::{Resolution, ResolveSessionCommand, ResolveSessionHandler};
