use chrono::{DateTime, Utc};
use reqwest::{RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotePayload {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Api {
        status: StatusCode,
        message: String,
        errors: BTreeMap<String, Vec<String>>,
    },

    #[error("Response from {0} carried no data")]
    MissingData(String),
}

impl ClientError {
    /// Text for the error banner. Server-side messages are shown as they are,
    /// with any field errors appended; anything else falls back to `fallback`.
    pub fn banner(&self, fallback: &str) -> String {
        match self {
            Self::Api {
                message, errors, ..
            } if !errors.is_empty() => {
                let details: Vec<&str> = errors.values().flatten().map(String::as_str).collect();
                format!("{message}: {}", details.join(" "))
            }
            Self::Api {
                status, message, ..
            } if message.is_empty() => format!("{fallback} ({status})"),
            Self::Api { message, .. } => message.clone(),
            Self::Transport(_) | Self::MissingData(_) => fallback.to_string(),
        }
    }
}

/// Typed access to the `/api/notes` endpoints.
pub struct NotesApi {
    client: reqwest::Client,
    base_url: String,
}

impl NotesApi {
    /// `base_url` points at the API root, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn notes_url(&self) -> String {
        format!("{}/notes", self.base_url)
    }

    fn note_url(&self, id: i64) -> String {
        format!("{}/notes/{id}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Envelope<T>, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let envelope: Envelope<T> = response.json().await?;

        if envelope.success {
            Ok(envelope)
        } else {
            tracing::debug!("API answered {}: {}", status, envelope.message);
            Err(ClientError::Api {
                status,
                message: envelope.message,
                errors: envelope.errors,
            })
        }
    }

    async fn fetch_data<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, ClientError> {
        self.send(request)
            .await?
            .data
            .ok_or_else(|| ClientError::MissingData(what.to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Note>, ClientError> {
        self.fetch_data(self.client.get(self.notes_url()), "GET /notes")
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Note, ClientError> {
        self.fetch_data(self.client.get(self.note_url(id)), "GET /notes/{id}")
            .await
    }

    pub async fn create(&self, payload: &NotePayload) -> Result<Note, ClientError> {
        self.fetch_data(
            self.client.post(self.notes_url()).json(payload),
            "POST /notes",
        )
        .await
    }

    pub async fn update(&self, id: i64, payload: &NotePayload) -> Result<Note, ClientError> {
        self.fetch_data(
            self.client.put(self.note_url(id)).json(payload),
            "PUT /notes/{id}",
        )
        .await
    }

    /// Returns the server's confirmation message.
    pub async fn delete(&self, id: i64) -> Result<String, ClientError> {
        let envelope: Envelope<serde_json::Value> =
            self.send(self.client.delete(self.note_url(id))).await?;
        Ok(envelope.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        extract::Path,
        http::StatusCode as AxumStatus,
        routing::{delete, get},
    };
    use serde_json::{Value, json};

    fn note_json(id: i64, title: &str) -> Value {
        json!({
            "id": id,
            "title": title,
            "content": "body",
            "created_at": "2026-02-12T10:00:00Z",
            "updated_at": "2026-02-12T10:00:00Z"
        })
    }

    async fn spawn_stub() -> NotesApi {
        let router = Router::new()
            .route(
                "/api/notes",
                get(|| async {
                    Json(json!({
                        "success": true,
                        "data": [note_json(2, "second"), note_json(1, "first")],
                        "message": "Notes retrieved successfully"
                    }))
                })
                .post(|Json(body): Json<Value>| async move {
                    if body["title"] == "" {
                        return (
                            AxumStatus::UNPROCESSABLE_ENTITY,
                            Json(json!({
                                "success": false,
                                "message": "Validation failed",
                                "errors": {"title": ["The title field is required."]}
                            })),
                        );
                    }
                    (
                        AxumStatus::CREATED,
                        Json(json!({
                            "success": true,
                            "data": note_json(3, body["title"].as_str().unwrap_or_default()),
                            "message": "Note created successfully"
                        })),
                    )
                }),
            )
            .route(
                "/api/notes/{id}",
                delete(|Path(id): Path<i64>| async move {
                    if id == 1 {
                        (
                            AxumStatus::OK,
                            Json(json!({"success": true, "message": "Note deleted successfully"})),
                        )
                    } else {
                        (
                            AxumStatus::NOT_FOUND,
                            Json(json!({"success": false, "message": "Note not found"})),
                        )
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        NotesApi::new(format!("http://{addr}/api/"))
    }

    #[tokio::test]
    async fn list_decodes_notes_in_server_order() {
        let api = spawn_stub().await;
        let notes = api.list().await.unwrap();

        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].title, "second");
        assert_eq!(notes[1].id, 1);
    }

    #[tokio::test]
    async fn create_returns_the_server_note() {
        let api = spawn_stub().await;
        let note = api
            .create(&NotePayload {
                title: "New Note".to_string(),
                content: "New Content".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(note.id, 3);
        assert_eq!(note.title, "New Note");
    }

    #[tokio::test]
    async fn validation_failure_keeps_field_errors() {
        let api = spawn_stub().await;
        let err = api
            .create(&NotePayload {
                title: String::new(),
                content: "x".to_string(),
            })
            .await
            .unwrap_err();

        match &err {
            ClientError::Api { status, errors, .. } => {
                assert_eq!(*status, StatusCode::UNPROCESSABLE_ENTITY);
                assert!(errors.contains_key("title"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            err.banner("Failed to create note"),
            "Validation failed: The title field is required."
        );
    }

    #[tokio::test]
    async fn delete_reports_confirmation_and_not_found() {
        let api = spawn_stub().await;

        assert_eq!(api.delete(1).await.unwrap(), "Note deleted successfully");

        let err = api.delete(7).await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status, .. } if status == StatusCode::NOT_FOUND));
        assert_eq!(err.banner("Failed to delete note"), "Note not found");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let api = NotesApi::new("http://127.0.0.1:9/api");
        let err = api.list().await.unwrap_err();

        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(err.banner("Failed to load notes"), "Failed to load notes");
    }
}
