//! HTTP error responses
//!
//! Every handler failure funnels through [`ApiError`]. Bodies always carry `message`;
//! 422s add `errors`.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::auth::AuthError;
use crate::forms::{FormError, ValidationErrorMap};
use crate::rules::FieldErrors;

pub const VALIDATION_FAILED: &str = "Validation failed";
pub const UNAUTHENTICATED: &str = "Unauthenticated.";
pub const FORM_NOT_FOUND: &str = "Form not found";

#[derive(Debug)]
pub enum ApiError {
    /// Request body failed its rules
    Validation(FieldErrors),
    /// Respondent values failed the value pass
    InvalidValues(ValidationErrorMap),
    Unauthenticated,
    NotFound,
    BadRequest(String),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidValues(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => json!({
                "message": VALIDATION_FAILED,
                "errors": errors,
            }),
            ApiError::InvalidValues(errors) => json!({
                "message": VALIDATION_FAILED,
                "valid": false,
                "errors": errors,
            }),
            ApiError::Unauthenticated => json!({ "message": UNAUTHENTICATED }),
            ApiError::NotFound => json!({ "message": FORM_NOT_FOUND }),
            ApiError::BadRequest(message) => json!({ "message": message }),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                json!({ "message": message })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if let Some(errors) = err.field_errors() {
            return ApiError::Validation(errors);
        }
        match err.status_code() {
            401 => ApiError::Unauthenticated,
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::NotFound => ApiError::NotFound,
            FormError::StorageError(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
