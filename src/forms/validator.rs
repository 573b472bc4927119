//! Schema-level validation
//!
//! Two passes that must not be conflated:
//! - editor-structural: is this schema fit to be saved?
//! - respondent-value: are these answers acceptable for this schema?
//!
//! Both return a `ValidationErrorMap`; an empty map is the only "proceed" signal.
//! Fields are validated in isolation, so a full recomputation is always safe.

use super::field_validator::validate_field;
use super::types::{
    Field, FieldValue, FormSchema, FormValue, ValidationErrorMap, FORM_ERROR_KEY, TITLE_ERROR_KEY,
};

pub const TITLE_REQUIRED: &str = "Title is required";
pub const FIELD_REQUIRED: &str = "Add at least one field";
pub const LABEL_REQUIRED: &str = "Label is required";
pub const TYPE_REQUIRED: &str = "Type is required";

/// Editor-structural pass, run before a schema is offered to storage.
pub fn validate_structure(schema: &FormSchema) -> ValidationErrorMap {
    let mut errors = ValidationErrorMap::new();

    if schema.title.trim().is_empty() {
        errors.insert(TITLE_ERROR_KEY.to_string(), TITLE_REQUIRED.to_string());
    }

    if schema.fields.is_empty() {
        errors.insert(FORM_ERROR_KEY.to_string(), FIELD_REQUIRED.to_string());
    }

    for field in &schema.fields {
        validate_field_structure(field, &mut errors);
    }

    errors
}

fn validate_field_structure(field: &Field, errors: &mut ValidationErrorMap) {
    if field.label.trim().is_empty() {
        errors.insert(format!("{}-label", field.id), LABEL_REQUIRED.to_string());
    }

    match field.field_type {
        None => {
            errors.insert(format!("{}-type", field.id), TYPE_REQUIRED.to_string());
        }
        Some(t) if t.is_option_based() && field.trimmed_options().is_empty() => {
            errors.insert(
                format!("{}-options", field.id),
                format!("Options are required for type {}", t),
            );
        }
        Some(_) => {}
    }
}

/// Respondent-value pass, keyed by field id only.
pub fn validate_values(fields: &[Field], values: &FormValue) -> ValidationErrorMap {
    fields
        .iter()
        .filter_map(|field| {
            let message = validate_field(field, values.get(&field.id));
            (!message.is_empty()).then(|| (field.id.clone(), message))
        })
        .collect()
}

/// The one entry point shared by the editing client, the CLI and the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormValidator;

impl FormValidator {
    pub fn new() -> Self {
        Self
    }

    /// Single-field check
    pub fn check_field(&self, field: &Field, value: Option<&FieldValue>) -> String {
        validate_field(field, value)
    }

    /// Editor-structural pass
    pub fn check_schema(&self, schema: &FormSchema) -> ValidationErrorMap {
        validate_structure(schema)
    }

    /// Respondent-value pass
    pub fn check_values(&self, schema: &FormSchema, values: &FormValue) -> ValidationErrorMap {
        validate_values(&schema.fields, values)
    }
}
