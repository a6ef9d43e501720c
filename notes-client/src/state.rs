use crate::api::{Note, NotePayload};

pub const EMPTY_FIELDS_ALERT: &str = "Fill in all fields";
pub const DELETE_CONFIRMATION: &str = "Delete this note?";

/// Form contents for the note being created or edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
}

impl From<&Note> for Draft {
    fn from(note: &Note) -> Self {
        Self {
            id: Some(note.id),
            title: note.title.clone(),
            content: note.content.clone(),
        }
    }
}

/// Action held by a confirmation dialog until the user answers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Delete(i64),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    Closed,
    Alert(String),
    Confirm {
        message: String,
        action: PendingAction,
    },
}

/// Request the form asks for once it passes the local checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submit {
    Create(NotePayload),
    Update(i64, NotePayload),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub notes: Vec<Note>,
    pub current_note: Draft,
    pub is_editing: bool,
    pub error: Option<String>,
    pub loading: bool,
    pub modal: Modal,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Starts in the loading state, before the first fetch completes.
    pub const fn new() -> Self {
        Self {
            notes: Vec::new(),
            current_note: Draft {
                id: None,
                title: String::new(),
                content: String::new(),
            },
            is_editing: false,
            error: None,
            loading: true,
            modal: Modal::Closed,
        }
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    pub fn loaded(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.error = None;
        self.loading = false;
    }

    pub fn load_failed(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Moves the form into edit mode for `id`. Returns `false` when the note
    /// is not in the local list.
    pub fn start_edit(&mut self, id: i64) -> bool {
        let Some(note) = self.notes.iter().find(|note| note.id == id) else {
            return false;
        };
        self.current_note = Draft::from(note);
        self.is_editing = true;
        true
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.current_note.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.current_note.content = content.into();
    }

    pub fn cancel(&mut self) {
        self.reset_form();
    }

    fn reset_form(&mut self) {
        self.is_editing = false;
        self.current_note = Draft::default();
    }

    /// Returns the request to send, or opens an alert when a field is empty.
    pub fn submit(&mut self) -> Option<Submit> {
        let draft = &self.current_note;
        if draft.title.trim().is_empty() || draft.content.trim().is_empty() {
            self.modal = Modal::Alert(EMPTY_FIELDS_ALERT.to_string());
            return None;
        }

        let payload = NotePayload {
            title: draft.title.clone(),
            content: draft.content.clone(),
        };
        match (self.is_editing, draft.id) {
            (true, Some(id)) => Some(Submit::Update(id, payload)),
            _ => Some(Submit::Create(payload)),
        }
    }

    /// The server's copy becomes the first entry.
    pub fn apply_created(&mut self, note: Note) {
        self.notes.insert(0, note);
        self.reset_form();
    }

    pub fn apply_updated(&mut self, note: Note) {
        if let Some(slot) = self.notes.iter_mut().find(|n| n.id == note.id) {
            *slot = note;
        }
        self.reset_form();
    }

    pub fn request_delete(&mut self, id: i64) {
        self.modal = Modal::Confirm {
            message: DELETE_CONFIRMATION.to_string(),
            action: PendingAction::Delete(id),
        };
    }

    /// Closes a confirmation dialog and hands back its action.
    pub fn confirm(&mut self) -> Option<PendingAction> {
        match std::mem::take(&mut self.modal) {
            Modal::Confirm { action, .. } => Some(action),
            other => {
                self.modal = other;
                None
            }
        }
    }

    pub fn dismiss(&mut self) {
        self.modal = Modal::Closed;
    }

    pub fn apply_deleted(&mut self, id: i64) {
        self.notes.retain(|note| note.id != id);
    }
}
