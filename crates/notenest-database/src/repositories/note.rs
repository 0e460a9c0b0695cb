//! Note repository implementation.

use std::sync::Arc;

use notenest_core::result::AppResult;
use notenest_core::traits::store::DocumentStore;
use notenest_entity::Note;
use notenest_entity::collections::NOTES;

use super::{decode, decode_all, encode};

/// Repository for note CRUD.
#[derive(Debug, Clone)]
pub struct NoteRepository {
    store: Arc<dyn DocumentStore>,
}

impl NoteRepository {
    /// Create a new note repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find a note by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Note>> {
        self.store
            .get(NOTES, id)
            .await?
            .map(|v| decode(NOTES, id, v))
            .transpose()
    }

    /// List all notes, most recently updated first.
    pub async fn find_all(&self) -> AppResult<Vec<Note>> {
        let mut notes: Vec<Note> = decode_all(NOTES, self.store.list(NOTES).await?);
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    /// Create or replace a note.
    pub async fn save(&self, note: &Note) -> AppResult<()> {
        self.store.set(NOTES, &note.id, encode(note)?).await
    }

    /// Delete a note.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        self.store.delete(NOTES, id).await
    }
}
