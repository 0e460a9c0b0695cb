//! Uploaded document entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata of an uploaded file. The bytes live in object storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique document identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Original file name from the upload.
    pub file_name: String,
    /// MIME type reported at upload.
    pub content_type: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Key of the object in storage.
    pub storage_key: String,
    /// When the document was uploaded.
    pub created_at: DateTime<Utc>,
}
