//! Spotify request and token types.

use serde::{Deserialize, Serialize};

/// Tokens returned by the accounts service.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSet {
    /// Bearer token for the Web API.
    pub access_token: String,
    /// Present on code exchange; usually absent on refresh.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of `access_token` in seconds.
    pub expires_in: u64,
    /// Granted scopes, space separated.
    #[serde(default)]
    pub scope: Option<String>,
}

/// Body of `PUT /me/player/play`. Empty resumes playback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayRequest {
    /// Album, artist, or playlist URI to play.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_uri: Option<String>,
    /// Track URIs to play.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uris: Option<Vec<String>>,
    /// Start position within the first track.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_ms: Option<u64>,
}

/// Repeat setting of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Repeat the current track.
    Track,
    /// Repeat the current context.
    Context,
    /// No repeat.
    Off,
}

impl RepeatMode {
    /// Query-string value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Context => "context",
            Self::Off => "off",
        }
    }
}
