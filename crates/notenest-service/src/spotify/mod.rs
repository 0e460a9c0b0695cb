//! Spotify Web API pass-through. Tokens live in the caller's cookies; the
//! client never stores them.

pub mod client;
pub mod types;

pub use client::SpotifyClient;
pub use types::{PlayRequest, RepeatMode, TokenSet};
