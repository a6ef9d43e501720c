use crate::{
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
    error::ApiError,
    repository::NoteStore,
    validation,
};

use std::sync::Arc;

#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub const fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    pub async fn create_note(&self, request: CreateNoteRequest) -> Result<NoteResponse, ApiError> {
        let note = validation::validate_create(&request).map_err(ApiError::Validation)?;

        let note = self.store.insert(note.title, note.content).await?;
        tracing::info!("created note {}", note.id);

        Ok(note.into())
    }

    /// Existence is checked before the payload, so an unknown id is a 404 even
    /// when the body could not be read or would not validate.
    pub async fn update_note(
        &self,
        id: i64,
        request: Result<UpdateNoteRequest, ApiError>,
    ) -> Result<NoteResponse, ApiError> {
        if self.store.get_by_id(id).await?.is_none() {
            return Err(ApiError::NotFound);
        }

        let request = request?;
        let changes = validation::validate_update(&request).map_err(ApiError::Validation)?;

        self.store
            .update(id, changes)
            .await?
            .map(NoteResponse::from)
            .ok_or(ApiError::NotFound)
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), ApiError> {
        if self.store.delete(id).await? {
            tracing::info!("deleted note {}", id);
            Ok(())
        } else {
            Err(ApiError::NotFound)
        }
    }

    pub async fn get_one_note(&self, id: i64) -> Result<NoteResponse, ApiError> {
        self.store
            .get_by_id(id)
            .await?
            .map(NoteResponse::from)
            .ok_or(ApiError::NotFound)
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, ApiError> {
        let notes = self.store.list_all().await?;

        Ok(notes.into_iter().map(NoteResponse::from).collect())
    }
}
