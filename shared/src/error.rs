use serde::{Deserialize, Serialize};

use crate::capabilities::{ClipboardError, FilesError, StorageError};
use crate::forms::FormError;
use crate::store::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
    Serialization,
    Deserialization,
    Attachment,
    Clipboard,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Storage => "STORAGE_ERROR",
            Self::Serialization => "SERIALIZATION_ERROR",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::Attachment => "ATTACHMENT_ERROR",
            Self::Clipboard => "CLIPBOARD_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub internal_message: Option<String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            internal_message: None,
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Validation => self.message.clone(),
            ErrorKind::NotFound => "The requested item could not be found.".into(),
            ErrorKind::Storage => {
                "Unable to save data locally. Please free up some storage space.".into()
            }
            ErrorKind::Serialization => {
                "A data error occurred. Your latest change may not have been saved.".into()
            }
            ErrorKind::Deserialization => {
                "Saved trips could not be read. Starting with an empty list.".into()
            }
            ErrorKind::Attachment => "The file could not be attached. Please try another.".into(),
            ErrorKind::Clipboard => "Couldn't copy to the clipboard. Copy it manually instead.".into(),
            ErrorKind::Internal => "An unexpected error occurred. Please try again.".into(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let kind = match &err {
            StoreError::TripNotFound(_) | StoreError::ScheduleNotFound { .. } => {
                ErrorKind::NotFound
            }
            StoreError::Serialization(_) => ErrorKind::Serialization,
            StoreError::Corrupted(_) => ErrorKind::Deserialization,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        Self::new(ErrorKind::Validation, capitalize(&err.to_string()))
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::new(ErrorKind::Storage, err.to_string())
    }
}

impl From<FilesError> for AppError {
    fn from(err: FilesError) -> Self {
        let kind = match err {
            FilesError::NotAnImage { .. } => ErrorKind::Validation,
            _ => ErrorKind::Attachment,
        };
        Self::new(kind, capitalize(&err.to_string()))
    }
}

impl From<ClipboardError> for AppError {
    fn from(err: ClipboardError) -> Self {
        Self::new(ErrorKind::Clipboard, capitalize(&err.to_string()))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TripId;

    #[test]
    fn store_errors_map_to_kinds() {
        let missing: AppError = StoreError::TripNotFound(TripId(3)).into();
        assert_eq!(missing.kind, ErrorKind::NotFound);
        assert_eq!(missing.code(), "NOT_FOUND");

        let corrupted: AppError = StoreError::Corrupted("eof".into()).into();
        assert_eq!(corrupted.kind, ErrorKind::Deserialization);
        assert!(corrupted.user_facing_message().contains("empty list"));
    }

    #[test]
    fn validation_messages_are_shown_verbatim() {
        let err: AppError = FormError::Required { field: "title" }.into();
        assert_eq!(err.user_facing_message(), "Title is required");
    }

    #[test]
    fn non_image_files_are_a_validation_problem() {
        let err: AppError = FilesError::NotAnImage {
            name: "notes.pdf".into(),
            mime: "application/pdf".into(),
        }
        .into();
        assert_eq!(err.kind, ErrorKind::Validation);

        let err: AppError = ClipboardError::Denied.into();
        assert_eq!(err.code(), "CLIPBOARD_ERROR");
        assert_eq!(err.message, "Clipboard access denied");
    }

    #[test]
    fn display_includes_internal_detail() {
        let err = AppError::new(ErrorKind::Storage, "write failed").with_internal("quota");
        assert_eq!(err.to_string(), "[STORAGE_ERROR] write failed (internal: quota)");
    }
}
