//! Client error types

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::forms::ValidationErrorMap;
use crate::rules::FieldErrors;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server rejected the token; the session has been cleared
    #[error("Unauthenticated")]
    Unauthorized,

    /// Server-side request validation failed
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// The shared validator rejected the schema or values
    #[error("Validation failed")]
    Invalid(ValidationErrorMap),

    #[error("Form not found")]
    NotFound,

    /// Any other non-success status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Request never completed
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Build an error from a non-success, non-401 response body
    pub(crate) fn from_response(status: StatusCode, body: Value) -> Self {
        match status {
            StatusCode::NOT_FOUND => ClientError::NotFound,
            StatusCode::UNPROCESSABLE_ENTITY => {
                let errors = body.get("errors").cloned().unwrap_or(Value::Null);
                if let Ok(errors) = serde_json::from_value::<FieldErrors>(errors.clone()) {
                    return ClientError::Validation(errors);
                }
                match serde_json::from_value::<ValidationErrorMap>(errors) {
                    Ok(errors) => ClientError::Invalid(errors),
                    Err(_) => server_error(status, &body),
                }
            }
            _ => server_error(status, &body),
        }
    }

    /// Whether retrying the same call might succeed
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

fn server_error(status: StatusCode, body: &Value) -> ClientError {
    ClientError::Server {
        status: status.as_u16(),
        message: body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error"))
            .to_string(),
    }
}
