//! Note entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A markdown note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique note identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub content: String,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// When the note was created.
    pub created_at: DateTime<Utc>,
    /// When the note was last modified.
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates a new note stamped with the current time.
    pub fn new(title: String, content: String, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: crate::new_id(),
            title,
            content,
            tags,
            created_at: now,
            updated_at: now,
        }
    }
}
