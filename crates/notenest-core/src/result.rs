//! Convenience result type alias for NoteNest.

use crate::error::AppError;

/// A specialized `Result` type for NoteNest operations.
pub type AppResult<T> = Result<T, AppError>;
