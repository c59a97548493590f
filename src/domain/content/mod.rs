//! Content domain module.
//!
//! Notes and files shared inside a session. Both are owned exclusively by
//! their session and disappear with it.

mod errors;
mod file;
mod note;

pub use errors::ContentError;
pub use file::{
    checksum, FileMetadata, FileUpload, StoredFile, GENERIC_MIME_TYPE, MAX_FILENAME_LENGTH,
};
pub use note::{Note, NoteChanges, NoteDraft};

/// Everything a session holds, oldest first. File blobs are not included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContent {
    pub notes: Vec<Note>,
    pub files: Vec<FileMetadata>,
}

impl SessionContent {
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.files.is_empty()
    }
}
