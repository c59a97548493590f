//! Content-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, FileId, NoteId, ValidationError};
use crate::ports::ContentRepositoryError;

/// Errors surfaced by content operations.
///
/// An expired session is reported exactly like one that never existed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// Session absent or expired.
    SessionNotFound(String),
    /// Note absent from the session.
    NoteNotFound(NoteId),
    /// File absent from the session.
    FileNotFound(FileId),
    /// Input rejected.
    ValidationFailed { field: String, message: String },
    /// Infrastructure error.
    Infrastructure(String),
}

impl ContentError {
    pub fn session_not_found(name: impl Into<String>) -> Self {
        ContentError::SessionNotFound(name.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ContentError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        ContentError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            ContentError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            ContentError::NoteNotFound(_) => ErrorCode::NoteNotFound,
            ContentError::FileNotFound(_) => ErrorCode::FileNotFound,
            ContentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            ContentError::Infrastructure(_) => ErrorCode::StorageFailure,
        }
    }
    pub fn message(&self) -> String {
        match self {
            ContentError::SessionNotFound(name) => format!("Session not found: {}", name),
            ContentError::NoteNotFound(id) => format!("Note not found: {}", id),
            ContentError::FileNotFound(id) => format!("File not found: {}", id),
            ContentError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            ContentError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ContentError::SessionNotFound(_)
                | ContentError::NoteNotFound(_)
                | ContentError::FileNotFound(_)
        )
    }
}

impl std::fmt::Display for ContentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ContentError {}

impl From<ContentRepositoryError> for ContentError {
    fn from(err: ContentRepositoryError) -> Self {
        match err {
            ContentRepositoryError::NoteNotFound(id) => ContentError::NoteNotFound(id),
            ContentRepositoryError::FileNotFound(id) => ContentError::FileNotFound(id),
            ContentRepositoryError::Storage(msg) => ContentError::Infrastructure(msg),
        }
    }
}

impl From<DomainError> for ContentError {
    fn from(err: DomainError) -> Self {
        ContentError::Infrastructure(err.to_string())
    }
}

impl From<ValidationError> for ContentError {
    fn from(err: ValidationError) -> Self {
        ContentError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_report_not_found() {
        assert!(ContentError::session_not_found("alpha").is_not_found());
        assert!(ContentError::NoteNotFound(NoteId::new(1)).is_not_found());
        assert!(ContentError::FileNotFound(FileId::new(1)).is_not_found());
        assert!(!ContentError::infrastructure("boom").is_not_found());
    }

    #[test]
    fn repository_errors_convert_precisely() {
        let err: ContentError = ContentRepositoryError::NoteNotFound(NoteId::new(5)).into();
        assert_eq!(err, ContentError::NoteNotFound(NoteId::new(5)));

        let err: ContentError = ContentRepositoryError::Storage("io".into()).into();
        assert_eq!(err.code(), ErrorCode::StorageFailure);
    }

    #[test]
    fn validation_error_converts_with_field() {
        let err: ContentError = ValidationError::empty_field("file").into();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(matches!(err, ContentError::ValidationFailed { ref field, .. } if field == "file"));
    }
}
