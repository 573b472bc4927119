//! Live preview
//!
//! Maps a schema plus in-progress answers to a list of control descriptors. Errors come
//! from the respondent-value pass, so the preview and a real submission always agree.

use serde::Serialize;

use super::types::{Field, FieldType, FieldValue, FormSchema, FormValue};
use super::validator::validate_values;

/// How a field is presented to a respondent
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    /// Single-line input with an HTML input type
    Input { input_type: &'static str },
    Textarea,
    Select { options: Vec<String> },
    CheckboxGroup { options: Vec<String> },
    RadioGroup { options: Vec<String> },
}

impl Control {
    fn for_field(field: &Field) -> Self {
        let options = || {
            field
                .trimmed_options()
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        };

        match field.field_type {
            None | Some(FieldType::Text) => Control::Input { input_type: "text" },
            Some(FieldType::Email) => Control::Input { input_type: "email" },
            Some(FieldType::Phone) => Control::Input { input_type: "tel" },
            Some(FieldType::Password) => Control::Input { input_type: "password" },
            Some(FieldType::Date) => Control::Input { input_type: "date" },
            Some(FieldType::Textarea) => Control::Textarea,
            Some(FieldType::Select) => Control::Select { options: options() },
            Some(FieldType::Checkbox) => Control::CheckboxGroup { options: options() },
            Some(FieldType::Radio) => Control::RadioGroup { options: options() },
        }
    }
}

/// One field as the respondent would see it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedField {
    pub id: String,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(flatten)]
    pub control: Control,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Rendered form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<RenderedField>,
    pub valid: bool,
}

/// Render `schema` with the current `values`, in display order.
pub fn render_preview(schema: &FormSchema, values: &FormValue) -> Preview {
    let mut errors = validate_values(&schema.fields, values);
    let valid = errors.is_empty();

    let fields = schema
        .fields
        .iter()
        .map(|field| RenderedField {
            id: field.id.clone(),
            label: field.label.clone(),
            required: field.required,
            placeholder: field.placeholder.clone(),
            control: Control::for_field(field),
            value: values.get(&field.id).cloned(),
            error: errors.remove(&field.id),
        })
        .collect();

    Preview {
        title: schema.title.clone(),
        description: schema.description.clone(),
        fields,
        valid,
    }
}
