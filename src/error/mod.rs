use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{dto::MessageResponse, validation::ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Note not found")]
    NotFound,

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Malformed request body: {message}")]
    BadRequest { status: StatusCode, message: String },

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(MessageResponse::failure("Note not found")),
            )
                .into_response(),
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(MessageResponse {
                    success: false,
                    message: "Validation failed".to_string(),
                    errors: Some(errors),
                }),
            )
                .into_response(),
            Self::BadRequest { status, message } => {
                (status, Json(MessageResponse::failure(message))).into_response()
            }
            Self::Database(e) => {
                tracing::error!("database request failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MessageResponse::failure("Internal server error")),
                )
                    .into_response()
            }
        }
    }
}
