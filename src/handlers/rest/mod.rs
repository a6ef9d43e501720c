
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_macros::debug_handler;
use utoipa::OpenApi;

use std::sync::Arc;

use crate::{
    dto::{ApiResponse, CreateNoteRequest, MessageResponse, NoteResponse, UpdateNoteRequest},
    error::ApiError,
    service::NoteService,
    validation::ValidationErrors,
};

#[derive(OpenApi)]
#[openapi(
    paths(create_note, update_note, delete_note, get_one_note, get_all_notes),
    components(schemas(
        NoteResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        MessageResponse,
        ValidationErrors
    )),
    servers((url = "/api")),
    tags(
        (name = "notes", description = "Notes management API")
    )
)]
pub struct ApiDoc;

type ApiResult<T> = Result<(StatusCode, Json<T>), ApiError>;

/// Ids that are not integers cannot name a row, so they resolve to a 404.
fn parse_id(id: &str) -> Result<i64, ApiError> {
    id.parse().map_err(|_| ApiError::NotFound)
}

#[utoipa::path(
    post,
    path = "/notes",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = ApiResponse<NoteResponse>),
        (status = 422, description = "Validation failed", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<NoteResponse>> {
    let Json(payload) = payload?;
    let note = service.create_note(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(note, "Note created successfully")),
    ))
}

#[utoipa::path(
    put,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = ApiResponse<NoteResponse>),
        (status = 404, description = "Note not found", body = MessageResponse),
        (status = 422, description = "Validation failed", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<NoteResponse>> {
    let id = parse_id(&id)?;
    let payload = payload.map(|Json(payload)| payload).map_err(ApiError::from);
    let note = service.update_note(id, payload).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(note, "Note updated successfully")),
    ))
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note deleted successfully", body = MessageResponse),
        (status = 404, description = "Note not found", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    service.delete_note(parse_id(&id)?).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::success("Note deleted successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = ApiResponse<NoteResponse>),
        (status = 404, description = "Note not found", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<NoteResponse>> {
    let note = service.get_one_note(parse_id(&id)?).await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(note, "Note retrieved successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/notes",
    responses(
        (status = 200, description = "All notes, most recent first", body = ApiResponse<Vec<NoteResponse>>),
        (status = 500, description = "Internal server error", body = MessageResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(
    State(service): State<Arc<NoteService>>,
) -> ApiResult<ApiResponse<Vec<NoteResponse>>> {
    let notes = service.get_all_notes().await?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success(notes, "Notes retrieved successfully")),
    ))
}
