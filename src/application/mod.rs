//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers mutate sessions and content; query handlers only read.

pub mod handlers;

pub use handlers::{
    // Session handlers
    ListActiveSessionsHandler, Resolution, ResolveSessionCommand, ResolveSessionHandler,
    // Content handlers
    CreateNoteCommand, CreateNoteHandler, DeleteFileCommand, DeleteFileHandler,
    DeleteNoteCommand, DeleteNoteHandler, DownloadFileHandler, DownloadFileQuery,
    ExportActiveFilesHandler, FileArchive, GetNoteHandler, GetNoteQuery,
    GetSessionContentHandler, GetSessionContentQuery, SessionContentView, UpdateNoteCommand,
    UpdateNoteHandler, UploadFileCommand, UploadFileHandler,
};
