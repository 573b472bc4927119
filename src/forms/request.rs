//! Request validation for form create/update bodies
//!
//! The server re-validates every body it receives; it never trusts a client-side pass.
//! Raw JSON is checked rule by rule so failures can be keyed by request path
//! (`title`, `fields.0.type`, `fields.2.options.1`). Once the shape is right the decoded
//! schema goes through the same editor-structural pass the editing client runs.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::types::{Field, FieldType, FormSchema};
use super::validator::validate_structure;
use crate::rules::{as_boolean, is_blank, messages, ErrorBag, FieldErrors};

/// Longest accepted title, in characters
pub const MAX_TITLE_CHARS: usize = 255;

/// Whether a key may be omitted from the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Required,
    Sometimes,
}

/// A shape-checked create/update body.
///
/// `None` means "not sent". For `description`, `Some(None)` means "sent as null".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub fields: Option<Vec<Field>>,
    pub is_published: Option<bool>,
}

impl FormInput {
    /// Build a new schema from a create body
    pub fn into_schema(self) -> FormSchema {
        FormSchema {
            id: None,
            title: self.title.unwrap_or_default(),
            description: self.description.flatten(),
            fields: self.fields.unwrap_or_default(),
            is_published: self.is_published.unwrap_or(false),
            created_at: None,
            updated_at: None,
        }
        .normalized()
    }

    /// Overlay an update body on a stored schema
    pub fn apply_to(self, mut schema: FormSchema) -> FormSchema {
        if let Some(title) = self.title {
            schema.title = title;
        }
        if let Some(description) = self.description {
            schema.description = description;
        }
        if let Some(fields) = self.fields {
            schema.fields = fields;
        }
        if let Some(is_published) = self.is_published {
            schema.is_published = is_published;
        }
        schema.normalized()
    }
}

/// Validate a create body and build the schema to store.
pub fn validate_create(body: &Value) -> Result<FormSchema, FieldErrors> {
    let input = validate_body(body, Presence::Required)?;
    let schema = input.into_schema();
    check_structure(&schema)?;
    Ok(schema)
}

/// Validate an update body and merge it into the stored schema.
pub fn validate_update(body: &Value, existing: FormSchema) -> Result<FormSchema, FieldErrors> {
    let input = validate_body(body, Presence::Sometimes)?;
    let schema = input.apply_to(existing);
    check_structure(&schema)?;
    Ok(schema)
}

fn check_structure(schema: &FormSchema) -> Result<(), FieldErrors> {
    let mut bag = ErrorBag::new();
    bag.merge(validate_structure(schema));
    bag.into_result()
}

fn validate_body(body: &Value, presence: Presence) -> Result<FormInput, FieldErrors> {
    let empty = Map::new();
    let obj = body.as_object().unwrap_or(&empty);
    let mut bag = ErrorBag::new();

    let title = validate_title(obj, presence, &mut bag);
    let description = validate_description(obj, &mut bag);
    let fields = validate_fields(obj, presence, &mut bag);

    let is_published = match obj.get("is_published") {
        None | Some(Value::Null) => None,
        Some(v) => {
            let parsed = as_boolean(v);
            if parsed.is_none() {
                bag.add("is_published", messages::boolean("is_published"));
            }
            parsed
        }
    };

    bag.into_result()?;

    Ok(FormInput {
        title,
        description,
        fields,
        is_published,
    })
}

fn validate_title(obj: &Map<String, Value>, presence: Presence, bag: &mut ErrorBag) -> Option<String> {
    let value = obj.get("title");
    if presence == Presence::Sometimes && value.is_none() {
        return None;
    }
    if is_blank(value) {
        bag.add("title", messages::required("title"));
        return None;
    }
    match value {
        Some(Value::String(s)) if s.chars().count() > MAX_TITLE_CHARS => {
            bag.add("title", messages::max_chars("title", MAX_TITLE_CHARS));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        _ => {
            bag.add("title", messages::string("title"));
            None
        }
    }
}

fn validate_description(obj: &Map<String, Value>, bag: &mut ErrorBag) -> Option<Option<String>> {
    match obj.get("description") {
        None => None,
        Some(Value::Null) => Some(None),
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(_) => {
            bag.add("description", messages::string("description"));
            None
        }
    }
}

fn validate_fields(
    obj: &Map<String, Value>,
    presence: Presence,
    bag: &mut ErrorBag,
) -> Option<Vec<Field>> {
    let value = obj.get("fields");
    if presence == Presence::Sometimes && value.is_none() {
        return None;
    }
    if is_blank(value) {
        bag.add("fields", messages::required("fields"));
        return None;
    }
    let Some(Value::Array(items)) = value else {
        bag.add("fields", messages::array("fields"));
        return None;
    };

    let mut seen_ids = HashSet::new();
    let mut fields = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if let Some(field) = validate_field_entry(index, item, &mut seen_ids, bag) {
            fields.push(field);
        }
    }

    (fields.len() == items.len()).then_some(fields)
}

fn validate_field_entry(
    index: usize,
    item: &Value,
    seen_ids: &mut HashSet<String>,
    bag: &mut ErrorBag,
) -> Option<Field> {
    let empty = Map::new();
    let obj = item.as_object().unwrap_or(&empty);
    let path = |name: &str| format!("fields.{}.{}", index, name);
    let mut ok = true;

    let id = match obj.get("id") {
        v if is_blank(v) => {
            bag.add(path("id"), messages::required(&path("id")));
            None
        }
        Some(Value::String(s)) => {
            if !seen_ids.insert(s.clone()) {
                bag.add(path("id"), messages::distinct(&path("id")));
                ok = false;
            }
            Some(s.clone())
        }
        _ => {
            bag.add(path("id"), messages::string(&path("id")));
            None
        }
    };

    let field_type = match obj.get("type") {
        v if is_blank(v) => {
            bag.add(path("type"), messages::required(&path("type")));
            None
        }
        Some(Value::String(s)) => {
            let parsed = FieldType::parse(s);
            if parsed.is_none() {
                bag.add(path("type"), messages::invalid_choice(&path("type")));
            }
            parsed
        }
        _ => {
            bag.add(path("type"), messages::string(&path("type")));
            None
        }
    };

    let label = match obj.get("label") {
        v if is_blank(v) => {
            bag.add(path("label"), messages::required(&path("label")));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        _ => {
            bag.add(path("label"), messages::string(&path("label")));
            None
        }
    };

    let required = match obj.get("required") {
        None | Some(Value::Null) => false,
        Some(v) => as_boolean(v).unwrap_or_else(|| {
            bag.add(path("required"), messages::boolean(&path("required")));
            ok = false;
            false
        }),
    };

    let options = match obj.get("options") {
        None | Some(Value::Null) => None,
        Some(Value::Array(raw)) => {
            let mut options = Vec::with_capacity(raw.len());
            for (i, option) in raw.iter().enumerate() {
                match option {
                    Value::Null => {}
                    Value::String(s) => options.push(s.clone()),
                    _ => {
                        let key = format!("fields.{}.options.{}", index, i);
                        bag.add(key.clone(), messages::string(&key));
                        ok = false;
                    }
                }
            }
            Some(options)
        }
        Some(_) => {
            bag.add(path("options"), messages::array(&path("options")));
            ok = false;
            None
        }
    };

    let placeholder = match obj.get("placeholder") {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    };

    match (id, field_type, label) {
        (Some(id), Some(field_type), Some(label)) if ok => Some(Field {
            id,
            field_type: Some(field_type),
            label,
            required,
            options,
            placeholder,
        }),
        _ => None,
    }
}
