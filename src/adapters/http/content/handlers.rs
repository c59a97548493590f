//! HTTP handlers for note and file endpoints.
//!
//! Every route is scoped by the session name in the first path segment.
//! Absent and expired sessions are indistinguishable to the client.

use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, Multipart, Path, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::adapters::http::error::{json_rejection, ErrorResponse};
use crate::application::handlers::content::{
    CreateNoteCommand, CreateNoteHandler, DeleteFileCommand, DeleteFileHandler,
    DeleteNoteCommand, DeleteNoteHandler, DownloadFileHandler, DownloadFileQuery, GetNoteHandler,
    GetNoteQuery, GetSessionContentHandler, GetSessionContentQuery, UpdateNoteCommand,
    UpdateNoteHandler, UploadFileCommand, UploadFileHandler,
};
use crate::domain::content::{ContentError, GENERIC_MIME_TYPE};
use crate::domain::foundation::{FileId, NoteId};
use crate::ports::{ContentRepository, SessionRegistry};

use super::dto::{
    FileResponse, MessageResponse, NoteRequest, NoteResponse, SessionContentResponse,
};

/// Multipart field carrying the upload.
const FILE_FIELD: &str = "file";

// ════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ContentAppState {
    pub registry: Arc<dyn SessionRegistry>,
    pub content: Arc<dyn ContentRepository>,
}

impl ContentAppState {
    pub fn new(registry: Arc<dyn SessionRegistry>, content: Arc<dyn ContentRepository>) -> Self {
        Self { registry, content }
    }

    fn get_session_content_handler(&self) -> GetSessionContentHandler {
        GetSessionContentHandler::new(self.registry.clone(), self.content.clone())
    }

    fn create_note_handler(&self) -> CreateNoteHandler {
        CreateNoteHandler::new(self.registry.clone(), self.content.clone())
    }

    fn get_note_handler(&self) -> GetNoteHandler {
        GetNoteHandler::new(self.registry.clone(), self.content.clone())
    }

    fn update_note_handler(&self) -> UpdateNoteHandler {
        UpdateNoteHandler::new(self.registry.clone(), self.content.clone())
    }

    fn delete_note_handler(&self) -> DeleteNoteHandler {
        DeleteNoteHandler::new(self.registry.clone(), self.content.clone())
    }

    fn upload_file_handler(&self) -> UploadFileHandler {
        UploadFileHandler::new(self.registry.clone(), self.content.clone())
    }

    fn download_file_handler(&self) -> DownloadFileHandler {
        DownloadFileHandler::new(self.registry.clone(), self.content.clone())
    }

    fn delete_file_handler(&self) -> DeleteFileHandler {
        DeleteFileHandler::new(self.registry.clone(), self.content.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Session content
// ════════════════════════════════════════════════════════════════════════════

/// GET /:session_name - Notes and file metadata of a live session
pub async fn get_session_content(
    State(state): State<ContentAppState>,
    Path(session_name): Path<String>,
) -> Response {
    let query = GetSessionContentQuery { session_name };

    match state.get_session_content_handler().handle(query).await {
        Ok(view) => (StatusCode::OK, Json(SessionContentResponse::from(&view))).into_response(),
        Err(e) => handle_content_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Notes
// ════════════════════════════════════════════════════════════════════════════

/// POST /:session_name/notes - Create a note
pub async fn create_note(
    State(state): State<ContentAppState>,
    Path(session_name): Path<String>,
    body: Result<Json<NoteRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection(rejection),
    };

    let cmd = CreateNoteCommand {
        session_name,
        title: req.title,
        content: req.content,
    };

    match state.create_note_handler().handle(cmd).await {
        Ok(note) => (StatusCode::CREATED, Json(NoteResponse::from(&note))).into_response(),
        Err(e) => handle_content_error(e),
    }
}

/// GET /:session_name/notes/:note_id - Read a note
pub async fn get_note(
    State(state): State<ContentAppState>,
    Path((session_name, note_id)): Path<(String, String)>,
) -> Response {
    let note_id = match parse_note_id(&note_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = GetNoteQuery {
        session_name,
        note_id,
    };

    match state.get_note_handler().handle(query).await {
        Ok(note) => (StatusCode::OK, Json(NoteResponse::from(&note))).into_response(),
        Err(e) => handle_content_error(e),
    }
}

/// PUT /:session_name/notes/:note_id - Update title and/or content
pub async fn update_note(
    State(state): State<ContentAppState>,
    Path((session_name, note_id)): Path<(String, String)>,
    body: Result<Json<NoteRequest>, JsonRejection>,
) -> Response {
    let note_id = match parse_note_id(&note_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let Json(req) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection(rejection),
    };

    let cmd = UpdateNoteCommand {
        session_name,
        note_id,
        title: req.title,
        content: req.content,
    };

    match state.update_note_handler().handle(cmd).await {
        Ok(note) => (StatusCode::OK, Json(NoteResponse::from(&note))).into_response(),
        Err(e) => handle_content_error(e),
    }
}

/// DELETE /:session_name/notes/:note_id
pub async fn delete_note(
    State(state): State<ContentAppState>,
    Path((session_name, note_id)): Path<(String, String)>,
) -> Response {
    let note_id = match parse_note_id(&note_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = DeleteNoteCommand {
        session_name,
        note_id,
    };

    match state.delete_note_handler().handle(cmd).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse::new(format!("Note {} deleted", note_id))),
        )
            .into_response(),
        Err(e) => handle_content_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Files
// ════════════════════════════════════════════════════════════════════════════

/// POST /:session_name/files - Upload the multipart field `file`
pub async fn upload_file(
    State(state): State<ContentAppState>,
    Path(session_name): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            return ErrorResponse::bad_request(rejection.body_text())
                .into_response_with(StatusCode::BAD_REQUEST)
        }
    };

    let mut upload = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return multipart_error(e.status(), e.body_text()),
        };
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let mimetype = field.content_type().map(str::to_string);
        match field.bytes().await {
            Ok(bytes) => {
                upload = Some((filename, mimetype, bytes.to_vec()));
                break;
            }
            Err(e) => return multipart_error(e.status(), e.body_text()),
        }
    }

    let Some((filename, mimetype, content)) = upload else {
        return ErrorResponse::validation(FILE_FIELD, "No file part in the request")
            .into_response_with(StatusCode::BAD_REQUEST);
    };

    let cmd = UploadFileCommand {
        session_name,
        filename,
        mimetype,
        content,
    };

    match state.upload_file_handler().handle(cmd).await {
        Ok(file) => (StatusCode::CREATED, Json(FileResponse::from(&file))).into_response(),
        Err(e) => handle_content_error(e),
    }
}

/// GET /:session_name/files/:file_id/download - Raw bytes as an attachment
pub async fn download_file(
    State(state): State<ContentAppState>,
    Path((session_name, file_id)): Path<(String, String)>,
) -> Response {
    let file_id = match parse_file_id(&file_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let query = DownloadFileQuery {
        session_name,
        file_id,
    };

    let file = match state.download_file_handler().handle(query).await {
        Ok(file) => file,
        Err(e) => return handle_content_error(e),
    };

    let (metadata, content) = file.into_parts();
    let content_type = HeaderValue::from_str(metadata.mimetype().unwrap_or(GENERIC_MIME_TYPE))
        .unwrap_or_else(|_| HeaderValue::from_static(GENERIC_MIME_TYPE));
    let disposition = HeaderValue::from_str(&content_disposition(metadata.filename()))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    let mut response = (StatusCode::OK, content).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    if let Ok(etag) = HeaderValue::from_str(&format!("\"{}\"", metadata.checksum())) {
        headers.insert(header::ETAG, etag);
    }
    response
}

/// DELETE /:session_name/files/:file_id
pub async fn delete_file(
    State(state): State<ContentAppState>,
    Path((session_name, file_id)): Path<(String, String)>,
) -> Response {
    let file_id = match parse_file_id(&file_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = DeleteFileCommand {
        session_name,
        file_id,
    };

    match state.delete_file_handler().handle(cmd).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse::new(format!("File {} deleted", file_id))),
        )
            .into_response(),
        Err(e) => handle_content_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

fn parse_note_id(raw: &str) -> Result<NoteId, Response> {
    raw.parse::<i64>().map(NoteId::new).map_err(|_| {
        ErrorResponse::bad_request(format!("Invalid note id '{}'", raw))
            .into_response_with(StatusCode::BAD_REQUEST)
    })
}

fn parse_file_id(raw: &str) -> Result<FileId, Response> {
    raw.parse::<i64>().map(FileId::new).map_err(|_| {
        ErrorResponse::bad_request(format!("Invalid file id '{}'", raw))
            .into_response_with(StatusCode::BAD_REQUEST)
    })
}

fn multipart_error(status: StatusCode, message: String) -> Response {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ErrorResponse::payload_too_large("Upload exceeds the configured size limit")
            .into_response_with(StatusCode::PAYLOAD_TOO_LARGE)
    } else {
        ErrorResponse::bad_request(message).into_response_with(StatusCode::BAD_REQUEST)
    }
}

/// `attachment` disposition with an ASCII fallback and an RFC 5987 name.
fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let encoded = utf8_percent_encode(filename, NON_ALPHANUMERIC);
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback, encoded
    )
}

fn handle_content_error(error: ContentError) -> Response {
    let code = error.code();
    let message = error.message();
    match error {
        ContentError::SessionNotFound(_)
        | ContentError::NoteNotFound(_)
        | ContentError::FileNotFound(_) => {
            ErrorResponse::from_code(code, message).into_response_with(StatusCode::NOT_FOUND)
        }
        ContentError::ValidationFailed { field, .. } => {
            ErrorResponse::validation(&field, message).into_response_with(StatusCode::BAD_REQUEST)
        }
        ContentError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "content storage failure");
            ErrorResponse::from_code(code, message)
                .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
