//! Share domain entities.

pub mod model;

pub use model::{ResourceType, ShareLink, ShareState};
