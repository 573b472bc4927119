//! Shared validation rules
//!
//! Shape checks used by both the field validator and request validation, plus the
//! `FieldErrors` bag that request validation reports through.

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::forms::ValidationErrorMap;

/// Dotted request path (e.g. `fields.0.type`) to every message raised for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

/// `local@domain.tld`: one non-whitespace run before `@`, one after containing a dot.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"))
        .is_match(value)
}

/// Exactly `DDD-DDD-DDDD` with ASCII digits.
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE
        .get_or_init(|| Regex::new(r"^[0-9]{3}-[0-9]{3}-[0-9]{4}$").expect("phone pattern compiles"))
        .is_match(value)
}

/// Absent, null, whitespace-only string or empty array
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Accepts `true`/`false` and the integers `0`/`1`.
pub fn as_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        _ => None,
    }
}

/// Collects request validation failures in path order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorBag {
    errors: FieldErrors,
}

impl ErrorBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a path
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(key.into()).or_default().push(message.into());
    }

    /// Whether `key` already has a message
    pub fn has(&self, key: &str) -> bool {
        self.errors.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Fold a single-message map (editor pass output) into the bag
    pub fn merge(&mut self, map: ValidationErrorMap) {
        for (key, message) in map {
            self.add(key, message);
        }
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    pub fn into_inner(self) -> FieldErrors {
        self.errors
    }
}

/// Standard rule messages
pub mod messages {
    pub fn required(attr: &str) -> String {
        format!("The {} field is required.", attr)
    }

    pub fn string(attr: &str) -> String {
        format!("The {} field must be a string.", attr)
    }

    pub fn array(attr: &str) -> String {
        format!("The {} field must be an array.", attr)
    }

    pub fn boolean(attr: &str) -> String {
        format!("The {} field must be true or false.", attr)
    }

    pub fn max_chars(attr: &str, max: usize) -> String {
        format!("The {} field must not be greater than {} characters.", attr, max)
    }

    pub fn min_chars(attr: &str, min: usize) -> String {
        format!("The {} field must be at least {} characters.", attr, min)
    }

    pub fn invalid_choice(attr: &str) -> String {
        format!("The selected {} is invalid.", attr)
    }

    pub fn distinct(attr: &str) -> String {
        format!("The {} field has a duplicate value.", attr)
    }

    pub fn email(attr: &str) -> String {
        format!("The {} field must be a valid email address.", attr)
    }

    pub fn confirmed(attr: &str) -> String {
        format!("The {} field confirmation does not match.", attr)
    }

    pub fn taken(attr: &str) -> String {
        format!("The {} has already been taken.", attr)
    }
}
