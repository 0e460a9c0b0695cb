//! # notenest-storage
//!
//! Object storage for uploaded documents. Objects are addressed by opaque
//! keys; the local filesystem provider is the only backend.

pub mod mime;
pub mod providers;

pub use providers::local::LocalStorageProvider;
