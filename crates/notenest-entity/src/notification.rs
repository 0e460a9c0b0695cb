//! Notification entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A site notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Unique identifier.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Whether the notification has been read.
    #[serde(default)]
    pub read: bool,
    /// When it was created.
    pub created_at: DateTime<Utc>,
}
