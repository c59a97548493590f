//! HTTP adapter for note and file endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    FileResponse, MessageResponse, NoteRequest, NoteResponse, SessionContentResponse,
};
pub use handlers::ContentAppState;
pub use routes::content_routes;
