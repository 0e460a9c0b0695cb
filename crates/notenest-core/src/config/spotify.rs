//! Spotify Web API configuration.

use serde::{Deserialize, Serialize};

/// OAuth client and endpoint settings for the playback panel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    /// OAuth client ID.
    #[serde(default)]
    pub client_id: String,
    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Redirect URI registered with Spotify (points at `/api/spotify/callback`).
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    /// Where the browser is sent after a successful callback.
    #[serde(default = "default_post_login_redirect")]
    pub post_login_redirect: String,
    /// Requested OAuth scopes.
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    /// Base URL of the Web API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Base URL of the accounts service (authorize + token).
    #[serde(default = "default_accounts_base")]
    pub accounts_base: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// Mark auth cookies `Secure`.
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
            post_login_redirect: default_post_login_redirect(),
            scopes: default_scopes(),
            api_base: default_api_base(),
            accounts_base: default_accounts_base(),
            request_timeout_seconds: default_timeout(),
            secure_cookies: false,
        }
    }
}

fn default_redirect_uri() -> String {
    "http://localhost:8080/api/spotify/callback".to_string()
}

fn default_post_login_redirect() -> String {
    "http://localhost:3000/spotify".to_string()
}

fn default_scopes() -> Vec<String> {
    [
        "user-read-playback-state",
        "user-modify-playback-state",
        "user-read-currently-playing",
        "playlist-read-private",
        "user-library-read",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_api_base() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_accounts_base() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_timeout() -> u64 {
    10
}
