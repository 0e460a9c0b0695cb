//! Capability traits defined in `notenest-core` and implemented by other crates.

pub mod storage;
pub mod store;

pub use storage::StorageProvider;
pub use store::DocumentStore;
