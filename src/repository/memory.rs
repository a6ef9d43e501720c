use async_trait::async_trait;
use chrono::{TimeDelta, Utc};

use std::sync::Mutex;

use crate::{
    models::{Note, NoteChanges},
    repository::NoteStore,
};

/// In-process `NoteStore` used by router and service tests.
#[derive(Default)]
pub struct MemoryStore {
    notes: Mutex<Vec<Note>>,
    next_id: Mutex<i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Note>, tokio_postgres::Error> {
        let mut notes = self.notes.lock().unwrap().clone();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(notes)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Note>, tokio_postgres::Error> {
        Ok(self
            .notes
            .lock()
            .unwrap()
            .iter()
            .find(|note| note.id == id)
            .cloned())
    }

    async fn insert(&self, title: String, content: String) -> Result<Note, tokio_postgres::Error> {
        let id = {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            *next_id
        };
        let now = Utc::now();
        let note = Note {
            id,
            title,
            content,
            created_at: now,
            updated_at: now,
        };
        self.notes.lock().unwrap().push(note.clone());
        Ok(note)
    }

    async fn update(
        &self,
        id: i64,
        changes: NoteChanges,
    ) -> Result<Option<Note>, tokio_postgres::Error> {
        let mut notes = self.notes.lock().unwrap();
        let Some(note) = notes.iter_mut().find(|note| note.id == id) else {
            return Ok(None);
        };

        let title = changes.title.unwrap_or_else(|| note.title.clone());
        let content = changes.content.unwrap_or_else(|| note.content.clone());
        if title != note.title || content != note.content {
            note.title = title;
            note.content = content;
            // keep updated_at strictly increasing even on a coarse clock
            note.updated_at = Utc::now().max(note.updated_at + TimeDelta::microseconds(1));
        }

        Ok(Some(note.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, tokio_postgres::Error> {
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|note| note.id != id);
        Ok(notes.len() != before)
    }
}
