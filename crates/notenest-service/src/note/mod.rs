//! Note management.

pub mod service;

pub use service::{CreateNoteRequest, NoteService, UpdateNoteRequest};
