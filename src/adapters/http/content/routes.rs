//! HTTP routes for note and file endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    create_note, delete_file, delete_note, download_file, get_note, get_session_content,
    update_note, upload_file, ContentAppState,
};

/// Creates the content router, scoped under `/:session_name`.
pub fn content_routes(state: ContentAppState) -> Router {
    Router::new()
        .route("/:session_name", get(get_session_content))
        .route("/:session_name/notes", post(create_note))
        .route(
            "/:session_name/notes/:note_id",
            get(get_note).put(update_note).delete(delete_note),
        )
        .route("/:session_name/files", post(upload_file))
        .route("/:session_name/files/:file_id", delete(delete_file))
        .route("/:session_name/files/:file_id/download", get(download_file))
        .with_state(state)
}
