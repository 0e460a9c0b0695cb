//! Note CRUD service.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use notenest_core::error::AppError;
use notenest_database::repositories::note::NoteRepository;
use notenest_database::repositories::share::ShareRepository;
use notenest_entity::Note;

/// Fields for a new note.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteRequest {
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Tags.
    pub tags: Vec<String>,
}

/// Partial update of a note. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoteRequest {
    /// New title.
    pub title: Option<String>,
    /// New body text.
    pub content: Option<String>,
    /// New tags.
    pub tags: Option<Vec<String>>,
}

/// Manages notes and keeps their share links consistent.
#[derive(Debug, Clone)]
pub struct NoteService {
    /// Note repository.
    note_repo: Arc<NoteRepository>,
    /// Share repository, for cascading deletes.
    share_repo: Arc<ShareRepository>,
}

impl NoteService {
    /// Creates a new note service.
    pub fn new(note_repo: Arc<NoteRepository>, share_repo: Arc<ShareRepository>) -> Self {
        Self {
            note_repo,
            share_repo,
        }
    }

    /// Lists all notes, most recently updated first.
    pub async fn list_notes(&self) -> Result<Vec<Note>, AppError> {
        self.note_repo.find_all().await
    }

    /// Gets a note by ID.
    pub async fn get_note(&self, id: &str) -> Result<Note, AppError> {
        self.note_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Note {id} not found")))
    }

    /// Creates a note.
    pub async fn create_note(&self, req: CreateNoteRequest) -> Result<Note, AppError> {
        let title = req.title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Note title must not be empty"));
        }

        let note = Note::new(title.to_string(), req.content, req.tags);
        self.note_repo.save(&note).await?;

        info!(note_id = %note.id, "Note created");
        Ok(note)
    }

    /// Applies a partial update to a note.
    pub async fn update_note(&self, id: &str, req: UpdateNoteRequest) -> Result<Note, AppError> {
        let mut note = self.get_note(id).await?;

        if let Some(title) = req.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(AppError::validation("Note title must not be empty"));
            }
            note.title = title.to_string();
        }
        if let Some(content) = req.content {
            note.content = content;
        }
        if let Some(tags) = req.tags {
            note.tags = tags;
        }
        note.updated_at = Utc::now();

        self.note_repo.save(&note).await?;
        Ok(note)
    }

    /// Deletes a note together with every share link pointing at it.
    pub async fn delete_note(&self, id: &str) -> Result<(), AppError> {
        if !self.note_repo.delete(id).await? {
            return Err(AppError::not_found(format!("Note {id} not found")));
        }

        let links = self.share_repo.delete_by_resource(id).await?;
        info!(note_id = %id, share_links_removed = links, "Note deleted");
        Ok(())
    }
}
