//! ExportActiveFilesHandler - Bundle every file of every live session.
//!
//! Produces a zip archive with one entry per file, named
//! `{session}/{file_id}_{filename}`. Files deleted while the archive is being
//! built are skipped.

use std::io::{Cursor, Write};
use std::sync::Arc;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::domain::content::{ContentError, StoredFile};
use crate::domain::foundation::Timestamp;
use crate::ports::{ContentRepository, ContentRepositoryError, SessionRegistry};

/// A finished zip archive.
#[derive(Debug, Clone)]
pub struct FileArchive {
    pub bytes: Vec<u8>,
    pub file_count: usize,
}

pub struct ExportActiveFilesHandler {
    registry: Arc<dyn SessionRegistry>,
    content: Arc<dyn ContentRepository>,
}

impl ExportActiveFilesHandler {
    pub fn new(registry: Arc<dyn SessionRegistry>, content: Arc<dyn ContentRepository>) -> Self {
        Self { registry, content }
    }

    pub async fn handle(&self) -> Result<FileArchive, ContentError> {
        let mut entries: Vec<(String, StoredFile)> = Vec::new();

        for session in self.registry.list_live(Timestamp::now()).await? {
            let listing = self.content.list_content(session.id()).await?;
            for meta in listing.files {
                match self.content.read_file(session.id(), meta.id()).await {
                    Ok(file) => {
                        let path = format!("{}/{}_{}", session.name(), meta.id(), meta.filename());
                        entries.push((path, file));
                    }
                    Err(ContentRepositoryError::FileNotFound(_)) => continue,
                    Err(e) => return Err(e.into()),
                }
            }
        }

        let file_count = entries.len();
        let bytes = write_archive(entries).map_err(ContentError::infrastructure)?;

        tracing::info!(files = file_count, bytes = bytes.len(), "exported live session files");
        Ok(FileArchive { bytes, file_count })
    }
}

fn write_archive(entries: Vec<(String, StoredFile)>) -> Result<Vec<u8>, String> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (path, file) in entries {
        writer
            .start_file(path, options)
            .map_err(|e| format!("Failed to start archive entry: {}", e))?;
        writer
            .write_all(file.content())
            .map_err(|e| format!("Failed to write archive entry: {}", e))?;
    }

    let cursor = writer
        .finish()
        .map_err(|e| format!("Failed to finish archive: {}", e))?;
    Ok(cursor.into_inner())
}
