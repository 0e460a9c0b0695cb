//! Share link token generation and URL building.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Generates share tokens and the URLs that embed them.
#[derive(Debug, Clone)]
pub struct LinkService {
    /// Origin the share URLs are built on.
    base_url: String,
    /// Characters per token.
    token_length: usize,
}

impl LinkService {
    /// Shortest token the service will generate.
    pub const MIN_TOKEN_LENGTH: usize = 12;

    /// Creates a new link service.
    pub fn new(base_url: impl Into<String>, token_length: usize) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_length: token_length.max(Self::MIN_TOKEN_LENGTH),
        }
    }

    /// Generates a random alphanumeric token from the thread-local CSPRNG.
    pub fn generate_token(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.token_length)
            .map(char::from)
            .collect()
    }

    /// The public URL for a token.
    pub fn build_url(&self, token: &str) -> String {
        format!("{}/share/{token}", self.base_url)
    }
}

impl Default for LinkService {
    fn default() -> Self {
        Self::new("http://localhost:3000", 20)
    }
}
