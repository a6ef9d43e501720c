use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::{models::Note, validation::ValidationErrors};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    /// Note ID
    pub id: i64,
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

// Request fields are kept as raw JSON so that missing, null and wrongly typed
// values can each be reported against the field they belong to. Bodies are
// read as JSON objects only; any other shape is a rejected body.

#[derive(Debug, Clone, Default, ToSchema)]
pub struct CreateNoteRequest {
    /// Note title, at most 255 characters
    #[schema(value_type = String, max_length = 255)]
    pub title: Option<Value>,
    /// Note content
    #[schema(value_type = String)]
    pub content: Option<Value>,
}

#[derive(Debug, Clone, Default, ToSchema)]
pub struct UpdateNoteRequest {
    /// New title, at most 255 characters
    #[schema(value_type = Option<String>, max_length = 255)]
    pub title: Option<Value>,
    /// New content
    #[schema(value_type = Option<String>)]
    pub content: Option<Value>,
}

/// Pulls `title` and `content` out of a JSON object. A key that is present
/// maps to `Some`, including an explicit `null`; other keys are ignored.
fn note_fields<'de, D>(deserializer: D) -> Result<(Option<Value>, Option<Value>), D::Error>
where
    D: Deserializer<'de>,
{
    let mut body = Map::<String, Value>::deserialize(deserializer)?;
    Ok((body.remove("title"), body.remove("content")))
}

impl<'de> Deserialize<'de> for CreateNoteRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (title, content) = note_fields(deserializer)?;
        Ok(Self { title, content })
    }
}

impl<'de> Deserialize<'de> for UpdateNoteRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (title, content) = note_fields(deserializer)?;
        Ok(Self { title, content })
    }
}

/// Envelope carrying a payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }
}

/// Envelope without a payload, used for confirmations and failures.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            errors: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: None,
        }
    }
}
