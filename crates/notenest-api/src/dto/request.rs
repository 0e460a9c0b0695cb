//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use notenest_entity::ResourceType;
use notenest_service::spotify::RepeatMode;

/// Create note request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNoteRequest {
    /// Title.
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    /// Markdown body.
    #[serde(default)]
    #[validate(length(max = 100000))]
    pub content: String,
    /// Tags.
    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 tags"))]
    pub tags: Vec<String>,
}

/// Update note request. Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateNoteRequest {
    /// New title.
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    /// New body.
    #[validate(length(max = 100000))]
    pub content: Option<String>,
    /// New tags.
    #[validate(length(max = 20, message = "At most 20 tags"))]
    pub tags: Option<Vec<String>>,
}

/// Create share link request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    /// ID of the note (or document) to share.
    #[validate(length(min = 1, message = "noteId is required"))]
    pub note_id: String,
    /// Kind of resource; notes by default.
    #[serde(default)]
    pub resource_type: ResourceType,
    /// Hours until expiry; 0 means permanent. At most ten years.
    #[validate(range(max = 87600, message = "expiresInHours must be at most 87600"))]
    pub expires_in_hours: u32,
    /// Maximum views; 0 means unlimited.
    #[validate(range(max = 1000000))]
    pub view_limit: u32,
}

/// Share listing filter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSharesQuery {
    /// Only links for this resource.
    pub resource_id: Option<String>,
}

/// Create notification request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    /// Title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Body.
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub message: String,
}

/// Create story request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateStoryRequest {
    /// Title.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Story text.
    #[validate(length(min = 1, max = 20000))]
    pub story: String,
}

/// Set a configuration value.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetConfigRequest {
    /// Any JSON value.
    pub value: Value,
}

/// Replace the realtime command payload.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetCommandRequest {
    /// Any JSON value.
    pub payload: Value,
}

/// Query parameters of the OAuth callback.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyCallbackQuery {
    /// Authorization code.
    pub code: Option<String>,
    /// Anti-forgery state echoed back.
    pub state: Option<String>,
    /// Set when the user declined.
    pub error: Option<String>,
}

/// Optional target device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceQuery {
    /// Device to act on; the active device when absent.
    pub device_id: Option<String>,
}

/// Start or resume playback.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PlayRequest {
    /// Device to play on.
    pub device_id: Option<String>,
    /// Album, artist, or playlist URI.
    pub context_uri: Option<String>,
    /// Track URIs.
    #[validate(length(max = 100))]
    pub uris: Option<Vec<String>>,
    /// Start position within the first track.
    pub position_ms: Option<u64>,
}

/// Seek within the current track.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SeekRequest {
    /// Target position.
    pub position_ms: u64,
    /// Device to act on.
    pub device_id: Option<String>,
}

/// Set the volume.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VolumeRequest {
    /// 0 to 100.
    #[validate(range(max = 100, message = "volumePercent must be between 0 and 100"))]
    pub volume_percent: u8,
    /// Device to act on.
    pub device_id: Option<String>,
}

/// Toggle shuffle.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShuffleRequest {
    /// Shuffle on or off.
    pub state: bool,
    /// Device to act on.
    pub device_id: Option<String>,
}

/// Set repeat mode.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RepeatRequest {
    /// `track`, `context`, or `off`.
    pub state: RepeatMode,
    /// Device to act on.
    pub device_id: Option<String>,
}

/// Move playback to another device.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    /// Target device.
    #[validate(length(min = 1, message = "deviceId is required"))]
    pub device_id: String,
    /// Start playing on the new device.
    #[serde(default)]
    pub play: bool,
}

/// Paging for Spotify listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageQuery {
    /// Items per page (1 to 50).
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Offset into the listing.
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    20
}
