//! HTTP DTOs for note and file endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::content::SessionContentView;
use crate::domain::content::{FileMetadata, Note};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body for creating or updating a note. Both fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct NoteResponse {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Note> for NoteResponse {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id().value(),
            title: note.title().map(str::to_string),
            content: note.content().map(str::to_string),
            created_at: note.created_at().to_rfc3339(),
            updated_at: note.updated_at().to_rfc3339(),
        }
    }
}

/// File metadata. Never carries the bytes.
#[derive(Debug, Clone, Serialize)]
pub struct FileResponse {
    pub id: i64,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    pub size: u64,
    pub checksum: String,
    pub created_at: String,
}

impl From<&FileMetadata> for FileResponse {
    fn from(file: &FileMetadata) -> Self {
        Self {
            id: file.id().value(),
            filename: file.filename().to_string(),
            mimetype: file.mimetype().map(str::to_string),
            size: file.size(),
            checksum: file.checksum().to_string(),
            created_at: file.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionContentResponse {
    pub name: String,
    pub expires_at: String,
    pub notes: Vec<NoteResponse>,
    pub files: Vec<FileResponse>,
}

impl From<&SessionContentView> for SessionContentResponse {
    fn from(view: &SessionContentView) -> Self {
        Self {
            name: view.session.name().to_string(),
            expires_at: view.session.expires_at().to_rfc3339(),
            notes: view.content.notes.iter().map(NoteResponse::from).collect(),
            files: view.content.files.iter().map(FileResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
