//! # notenest-database
//!
//! Document store backends (in-memory and PostgreSQL) and the typed
//! repositories layered on top of them.

pub mod repositories;
pub mod store;

pub use store::{MemoryDocumentStore, PostgresDocumentStore, connect};
