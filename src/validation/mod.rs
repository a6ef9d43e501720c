use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use std::{collections::BTreeMap, fmt};

use crate::{
    dto::{CreateNoteRequest, UpdateNoteRequest},
    models::{NewNote, NoteChanges},
};

pub const TITLE_MAX_CHARS: usize = 255;

/// Messages per offending field, serialized as `{"title": ["..."]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: String) {
        self.0.entry(field.to_string()).or_default().push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().flatten().map(String::as_str).collect();
        write!(f, "{}", messages.join(" "))
    }
}

#[derive(Clone, Copy)]
enum Presence {
    Required,
    /// Only validated when the key is present in the body.
    Sometimes,
}

/// Checks one string field and returns its trimmed value when it passes.
fn check_string(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&Value>,
    presence: Presence,
    max_chars: Option<usize>,
) -> Option<String> {
    let value = match (value, presence) {
        (None, Presence::Sometimes) => return None,
        (None, Presence::Required) => {
            errors.add(field, format!("The {field} field is required."));
            return None;
        }
        (Some(value), _) => value,
    };

    let text = match value {
        Value::Null => {
            errors.add(field, format!("The {field} field is required."));
            return None;
        }
        Value::String(text) => text.trim(),
        _ => {
            errors.add(field, format!("The {field} field must be a string."));
            return None;
        }
    };

    if text.is_empty() {
        errors.add(field, format!("The {field} field is required."));
        return None;
    }

    // PostgreSQL text columns cannot hold NUL
    if text.contains('\0') {
        errors.add(
            field,
            format!("The {field} field must not contain null characters."),
        );
        return None;
    }

    if let Some(max) = max_chars.filter(|max| text.chars().count() > *max) {
        errors.add(
            field,
            format!("The {field} field must not be greater than {max} characters."),
        );
        return None;
    }

    Some(text.to_string())
}

pub fn validate_create(request: &CreateNoteRequest) -> Result<NewNote, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = check_string(
        &mut errors,
        "title",
        request.title.as_ref(),
        Presence::Required,
        Some(TITLE_MAX_CHARS),
    );
    let content = check_string(
        &mut errors,
        "content",
        request.content.as_ref(),
        Presence::Required,
        None,
    );

    match (title, content) {
        (Some(title), Some(content)) if errors.is_empty() => Ok(NewNote { title, content }),
        _ => Err(errors),
    }
}

pub fn validate_update(request: &UpdateNoteRequest) -> Result<NoteChanges, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = check_string(
        &mut errors,
        "title",
        request.title.as_ref(),
        Presence::Sometimes,
        Some(TITLE_MAX_CHARS),
    );
    let content = check_string(
        &mut errors,
        "content",
        request.content.as_ref(),
        Presence::Sometimes,
        None,
    );

    if errors.is_empty() {
        Ok(NoteChanges { title, content })
    } else {
        Err(errors)
    }
}
