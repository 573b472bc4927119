//! # Auth Errors
//!
//! Error types for the authentication module.

use thiserror::Error;

use crate::rules::{messages, FieldErrors};

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Message reported against `email` when login fails
pub const INVALID_CREDENTIALS: &str = "The provided credentials are incorrect.";

/// Authentication errors
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // ==================
    // Request Errors
    // ==================
    /// Register/login body failed its rules
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Unknown email or wrong password (generic - don't leak which)
    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    /// Email already registered
    #[error("Email already registered")]
    EmailAlreadyExists,

    // ==================
    // Session Errors
    // ==================
    /// Token unknown or session expired
    #[error("Session expired or invalid")]
    SessionInvalid,

    /// Session has been revoked
    #[error("Session has been revoked")]
    SessionRevoked,

    // ==================
    // Internal Errors
    // ==================
    /// Password hashing failed
    #[error("Internal error: password hashing failed")]
    HashingFailed,

    /// Storage operation failed
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl AuthError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 422 Unprocessable Entity
            AuthError::Validation(_) => 422,
            AuthError::InvalidCredentials => 422,
            AuthError::EmailAlreadyExists => 422,

            // 401 Unauthorized
            AuthError::SessionInvalid => 401,
            AuthError::SessionRevoked => 401,

            // 500 Internal Server Error
            AuthError::HashingFailed => 500,
            AuthError::StorageError(_) => 500,
        }
    }

    /// Returns whether this error should be logged at warn level
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Per-key messages for the 422 variants
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            AuthError::Validation(errors) => Some(errors.clone()),
            AuthError::InvalidCredentials => Some(single("email", INVALID_CREDENTIALS.to_string())),
            AuthError::EmailAlreadyExists => Some(single("email", messages::taken("email"))),
            _ => None,
        }
    }
}

fn single(key: &str, message: String) -> FieldErrors {
    FieldErrors::from([(key.to_string(), vec![message])])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 422);
        assert_eq!(AuthError::SessionRevoked.status_code(), 401);
        assert_eq!(AuthError::SessionInvalid.status_code(), 401);
        assert_eq!(AuthError::HashingFailed.status_code(), 500);
        assert!(!AuthError::StorageError("x".into()).is_client_error());
    }

    #[test]
    fn test_error_messages_do_not_leak_info() {
        // InvalidCredentials should be generic
        let err = AuthError::InvalidCredentials;
        assert!(!err.to_string().contains("password"));
        assert_eq!(
            err.field_errors().unwrap()["email"],
            vec!["The provided credentials are incorrect."]
        );
    }

    #[test]
    fn test_duplicate_email_is_keyed_by_email() {
        let errors = AuthError::EmailAlreadyExists.field_errors().unwrap();
        assert_eq!(errors["email"], vec!["The email has already been taken."]);
        assert!(AuthError::SessionInvalid.field_errors().is_none());
    }
}
