//! Core type definitions used across the NoteNest workspace.

pub mod change;

pub use change::{ChangeEvent, ChangeFeed, ChangeKind, Subscription};
