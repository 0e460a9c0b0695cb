//! # notenest-entity
//!
//! Domain entities stored in the document store. Field names serialize in
//! camelCase, matching the stored documents and the JSON API.

pub mod collections;
pub mod command;
pub mod document;
pub mod note;
pub mod notification;
pub mod share;
pub mod story;

pub use command::CommandMetadata;
pub use document::Document;
pub use note::Note;
pub use notification::Notification;
pub use share::{ResourceType, ShareLink, ShareState};
pub use story::WhyStory;

/// Generates a new document ID.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
