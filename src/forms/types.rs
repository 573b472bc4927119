//! Form schema type definitions
//!
//! Supported field types:
//! - text, textarea, password, date: free text
//! - email, phone: free text with a shape check
//! - select, checkbox, radio: option-based

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Key used in a [`ValidationErrorMap`] for errors that concern the whole form.
pub const FORM_ERROR_KEY: &str = "form";

/// Key used in a [`ValidationErrorMap`] for the form title.
pub const TITLE_ERROR_KEY: &str = "title";

/// Field id (or `<id>-label` style editor key) to human-readable message.
///
/// Ordered so that two runs over the same input serialize identically.
pub type ValidationErrorMap = BTreeMap<String, String>;

/// Submission-time values keyed by field id.
pub type FormValue = BTreeMap<String, FieldValue>;

/// Closed set of field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Select,
    Checkbox,
    Radio,
    Email,
    Phone,
    Password,
    Date,
}

impl FieldType {
    /// Every field type, in declaration order
    pub const ALL: [FieldType; 9] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Password,
        FieldType::Date,
    ];

    /// Returns the wire name of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Password => "password",
            FieldType::Date => "date",
        }
    }

    /// Parses a wire name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == name)
    }

    /// Whether the type needs a non-empty option list
    pub fn is_option_based(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Checkbox | FieldType::Radio
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input slot within a form schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Stable identifier, unique within its schema
    pub id: String,

    /// Field type. `None` while a draft has no (or an unrecognised) type.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "deserialize_field_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub field_type: Option<FieldType>,

    /// Display label
    #[serde(default)]
    pub label: String,

    /// Whether a respondent must supply a value
    #[serde(default)]
    pub required: bool,

    /// Selectable options, meaningful only for option-based types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,

    /// Cosmetic hint, never validated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Field {
    /// Create a field of the given type with no options
    pub fn new(id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type: Some(field_type),
            label: label.into(),
            required: false,
            options: None,
            placeholder: None,
        }
    }

    /// Builder: mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Builder: set the option list
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Builder: set the placeholder
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Whether this field's type is option-based
    pub fn is_option_based(&self) -> bool {
        self.field_type.map_or(false, |t| t.is_option_based())
    }

    /// Options with surrounding whitespace removed and blanks dropped
    pub fn trimmed_options(&self) -> Vec<&str> {
        self.options
            .iter()
            .flatten()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .collect()
    }

    /// Drops `options` for types that do not use them and trims them for the rest.
    pub fn normalized(mut self) -> Self {
        self.options = if self.is_option_based() {
            self.options
                .as_ref()
                .map(|_| self.trimmed_options().into_iter().map(str::to_string).collect())
        } else {
            None
        };
        self
    }
}

/// Unknown or missing type names decode as `None` so that a draft can still be loaded and
/// reported on by the editor pass.
fn deserialize_field_type<'de, D>(deserializer: D) -> Result<Option<FieldType>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(FieldType::parse))
}

/// The authored definition of a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Assigned by storage on first save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Display order
    #[serde(default)]
    pub fields: Vec<Field>,

    /// Draft (false) or published (true)
    #[serde(default)]
    pub is_published: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FormSchema {
    /// Create an unsaved draft
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            fields: Vec::new(),
            is_published: false,
            created_at: None,
            updated_at: None,
        }
    }

    /// Builder: set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: append a field
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Builder: set the publish flag
    pub fn published(mut self, is_published: bool) -> Self {
        self.is_published = is_published;
        self
    }

    /// Normalizes every field for storage, preserving order.
    pub fn normalized(mut self) -> Self {
        self.fields = self.fields.into_iter().map(Field::normalized).collect();
        self
    }
}

/// A respondent's value for one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Single value (text inputs, select, radio)
    Text(String),
    /// Several values (checkbox groups)
    Multi(Vec<String>),
}

impl FieldValue {
    /// Empty string or empty sequence
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Multi(values) => values.is_empty(),
        }
    }

    /// Iterates the contained strings
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let items = match self {
            FieldValue::Text(s) => std::slice::from_ref(s),
            FieldValue::Multi(values) => values.as_slice(),
        };
        items.iter().map(String::as_str)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::Multi(values.into_iter().map(str::to_string).collect())
    }
}
