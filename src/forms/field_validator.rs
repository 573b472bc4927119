//! Single-field validation
//!
//! Rules run in a fixed order and the first failure wins:
//! 1. required and empty
//! 2. type-specific shape check (only for non-empty values)
//!
//! Invalidity is returned as a message, never as an error.

use super::types::{Field, FieldType, FieldValue};
use crate::rules::{is_valid_email, is_valid_phone};

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const INVALID_PHONE: &str = "Please enter a valid phone number (format: 123-456-7890)";
pub const INVALID_OPTION: &str = "Please select a valid option";
pub const NO_OPTION_SELECTED: &str = "Please select at least one option";

/// Validates one value against one field definition.
///
/// Returns an empty string when the value is acceptable.
pub fn validate_field(field: &Field, value: Option<&FieldValue>) -> String {
    let is_empty = value.map_or(true, FieldValue::is_empty);

    if is_empty {
        if field.required {
            return format!("{} is required", field.label);
        }
        return String::new();
    }

    // Non-empty from here on
    let Some(value) = value else {
        return String::new();
    };

    match field.field_type {
        Some(FieldType::Email) if !value.iter().all(is_valid_email) => INVALID_EMAIL.to_string(),
        Some(FieldType::Phone) if !value.iter().all(is_valid_phone) => INVALID_PHONE.to_string(),
        Some(FieldType::Select) => {
            let options = field.trimmed_options();
            if value.iter().all(|v| options.contains(&v)) {
                String::new()
            } else {
                INVALID_OPTION.to_string()
            }
        }
        Some(FieldType::Checkbox) if field.required && !matches!(value, FieldValue::Multi(_)) => {
            NO_OPTION_SELECTED.to_string()
        }
        _ => String::new(),
    }
}
