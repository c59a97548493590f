//! HTTP routes for session endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{download_all_files, list_sessions, resolve_session, SessionHandlers};

/// Creates the session router.
///
/// The live session index and bulk download are mounted only when
/// `with_index` is set; otherwise those paths fall through to 404.
pub fn session_routes(handlers: SessionHandlers, with_index: bool) -> Router {
    let router = Router::new().route("/session", post(resolve_session));

    let router = if with_index {
        router
            .route("/sessions", get(list_sessions))
            .route("/sessions/active/files/download_all", get(download_all_files))
    } else {
        router
    };

    router.with_state(handlers)
}
