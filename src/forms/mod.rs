//! Form schemas and their validation
//!
//! - `types`: schema, field and value types
//! - `field_validator` / `validator`: the shared validation passes
//! - `request`: authoritative request-body validation for the server
//! - `preview`: respondent-facing rendering
//! - `repository`: owner-scoped storage

pub mod errors;
pub mod field_validator;
pub mod preview;
pub mod repository;
pub mod request;
pub mod types;
pub mod validator;

pub use errors::{FormError, FormResult};
pub use field_validator::validate_field;
pub use preview::{render_preview, Control, Preview, RenderedField};
pub use repository::{FileFormRepository, FormRepository, InMemoryFormRepository, Page};
pub use request::{validate_create, validate_update, FormInput};
pub use types::{
    Field, FieldType, FieldValue, FormSchema, FormValue, ValidationErrorMap, FORM_ERROR_KEY,
    TITLE_ERROR_KEY,
};
pub use validator::{validate_structure, validate_values, FormValidator};
