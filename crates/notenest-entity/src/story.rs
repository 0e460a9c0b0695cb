//! "Why" story entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short story shown in the portfolio's "why" section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhyStory {
    /// Unique identifier.
    pub id: String,
    /// Title.
    pub title: String,
    /// Story text.
    pub story: String,
    /// When it was created.
    pub created_at: DateTime<Utc>,
}
