//! Share-link configuration.

use serde::{Deserialize, Serialize};

/// Share-link issuance and cleanup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Public origin that share URLs are built on (`{base_url}/share/{token}`).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Number of alphanumeric characters in a generated token.
    #[serde(default = "default_token_length")]
    pub token_length: usize,
    /// Delay before a link that reached its view limit is deleted.
    #[serde(default = "default_cleanup_delay")]
    pub cleanup_delay_seconds: u64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_length: default_token_length(),
            cleanup_delay_seconds: default_cleanup_delay(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_token_length() -> usize {
    20
}

fn default_cleanup_delay() -> u64 {
    5
}
