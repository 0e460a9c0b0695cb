//! Document store collection names.

/// Uploaded document metadata.
pub const DOCUMENTS: &str = "documents";
/// Notes.
pub const NOTES: &str = "notes";
/// Share links, keyed by token.
pub const SHARED_NOTE_LINKS: &str = "sharedNoteLinks";
/// Site configuration values, keyed by name.
pub const CONFIG: &str = "config";
/// Notifications.
pub const NOTIFICATIONS: &str = "notifications";
/// Reserved for persisted Spotify state; playback is always read live.
pub const SPOTIFY_DATA: &str = "spotify_data";
/// "Why" stories shown on the portfolio.
pub const WHY_STORIES: &str = "why_stories";
/// Realtime command channel.
pub const COMMANDS: &str = "commands";
/// The single document under [`COMMANDS`].
pub const COMMAND_METADATA_ID: &str = "metadata";

/// Collections a client may watch over the realtime feed.
pub const SUBSCRIBABLE: &[&str] = &[NOTES, DOCUMENTS, NOTIFICATIONS, COMMANDS];
