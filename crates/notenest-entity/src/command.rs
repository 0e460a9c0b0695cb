//! Realtime command metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The document stored at `commands/metadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandMetadata {
    /// Arbitrary client-defined payload.
    pub payload: serde_json::Value,
    /// When the payload was last written.
    pub updated_at: DateTime<Utc>,
}
