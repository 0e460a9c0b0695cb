//! # notenest-core
//!
//! Core crate for NoteNest. Contains the injected capability traits
//! (document store, object storage), configuration schemas, change-feed
//! types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other NoteNest crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
