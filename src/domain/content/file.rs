//! File entity and upload value object.
//!
//! Files are immutable once stored: there is no update, only create,
//! download and delete.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::foundation::{FileId, SessionId, Timestamp, ValidationError};

/// Maximum length of a stored filename.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// MIME type browsers send when they do not know better.
pub const GENERIC_MIME_TYPE: &str = "application/octet-stream";

/// Validated file upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    filename: String,
    mimetype: Option<String>,
    checksum: String,
    content: Vec<u8>,
}

impl FileUpload {
    /// Validate an upload.
    ///
    /// The filename is reduced to its final path segment. A missing or
    /// generic MIME type is replaced by a guess from the extension when one
    /// is available.
    pub fn new(
        filename: impl AsRef<str>,
        declared_mime: Option<String>,
        content: Vec<u8>,
    ) -> Result<Self, ValidationError> {
        let filename = sanitize_filename(filename.as_ref());
        if filename.is_empty() {
            return Err(ValidationError::empty_field("filename"));
        }
        let len = filename.chars().count();
        if len > MAX_FILENAME_LENGTH {
            return Err(ValidationError::too_long("filename", MAX_FILENAME_LENGTH, len));
        }
        if content.is_empty() {
            return Err(ValidationError::empty_field("file"));
        }

        let mimetype = resolve_mime(&filename, declared_mime);
        let checksum = checksum(&content);

        Ok(Self {
            filename,
            mimetype,
            checksum,
            content,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mimetype(&self) -> Option<&str> {
        self.mimetype.as_deref()
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    /// Size in bytes, derived from the content.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }
}

fn sanitize_filename(raw: &str) -> String {
    raw.rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn resolve_mime(filename: &str, declared: Option<String>) -> Option<String> {
    let declared = declared
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

    match declared {
        Some(mime) if mime != GENERIC_MIME_TYPE => Some(mime),
        other => mime_guess::from_path(filename)
            .first_raw()
            .map(str::to_string)
            .or(other),
    }
}

/// Hex-encoded SHA-256 of the content.
pub fn checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Metadata of a stored file; what content listings expose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    id: FileId,
    session_id: SessionId,
    filename: String,
    mimetype: Option<String>,
    size: u64,
    checksum: String,
    created_at: Timestamp,
}

impl FileMetadata {
    /// Reconstitute metadata from persistence (no validation).
    pub fn reconstitute(
        id: FileId,
        session_id: SessionId,
        filename: String,
        mimetype: Option<String>,
        size: u64,
        checksum: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            session_id,
            filename,
            mimetype,
            size,
            checksum,
            created_at,
        }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mimetype(&self) -> Option<&str> {
        self.mimetype.as_deref()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }
}

/// A stored file: metadata plus the exact bytes supplied at upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    metadata: FileMetadata,
    content: Vec<u8>,
}

impl StoredFile {
    /// Materialize an upload under an allocated id.
    pub fn create(id: FileId, session_id: SessionId, upload: FileUpload, now: Timestamp) -> Self {
        let metadata = FileMetadata {
            id,
            session_id,
            size: upload.size(),
            filename: upload.filename,
            mimetype: upload.mimetype,
            checksum: upload.checksum,
            created_at: now,
        };
        Self {
            metadata,
            content: upload.content,
        }
    }

    pub fn from_parts(metadata: FileMetadata, content: Vec<u8>) -> Self {
        Self { metadata, content }
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn into_parts(self) -> (FileMetadata, Vec<u8>) {
        (self.metadata, self.content)
    }
}
