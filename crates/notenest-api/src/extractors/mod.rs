//! Custom Axum extractors.

pub mod spotify;
pub mod validated;

pub use spotify::SpotifyToken;
pub use validated::ValidatedJson;
