//! # Form Storage Errors

use thiserror::Error;

/// Result type for form storage operations
pub type FormResult<T> = Result<T, FormError>;

/// Failures of the storage collaborator. Validation failures are never reported here.
#[derive(Debug, Clone, Error)]
pub enum FormError {
    /// No form with this id belongs to the caller
    #[error("Form not found")]
    NotFound,

    /// Storage operation failed
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl FormError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            FormError::NotFound => 404,
            FormError::StorageError(_) => 500,
        }
    }
}
