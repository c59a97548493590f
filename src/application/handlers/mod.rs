//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod content;
pub mod session;

pub use content::{
    CreateNoteCommand, CreateNoteHandler, DeleteFileCommand, DeleteFileHandler,
    DeleteNoteCommand, DeleteNoteHandler, DownloadFileHandler, DownloadFileQuery,
    ExportActiveFilesHandler, FileArchive, GetNoteHandler, GetNoteQuery,
    GetSessionContentHandler, GetSessionContentQuery, SessionContentView, UpdateNoteCommand,
    UpdateNoteHandler, UploadFileCommand, UploadFileHandler,
};
pub use session::{
    ListActiveSessionsHandler, Resolution, ResolveSessionCommand, ResolveSessionHandler,
};
