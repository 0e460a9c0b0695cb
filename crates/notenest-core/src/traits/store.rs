//! Document store capability.
//!
//! The store holds schemaless JSON documents addressed by
//! `(collection, id)`. Repositories in `notenest-database` layer typed
//! entities on top of it. Handlers never reach a global client: the store
//! is injected as `Arc<dyn DocumentStore>`.

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;
use crate::types::change::Subscription;

/// Trait for document store backends (in-memory, PostgreSQL).
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend name (e.g. "memory", "postgres").
    fn provider_type(&self) -> &str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Fetch a document. Returns `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>>;

    /// Create or replace a document.
    async fn set(&self, collection: &str, id: &str, data: Value) -> AppResult<()>;

    /// Shallow-merge the top-level fields of `patch` into an existing
    /// document. Returns the merged document, or `None` if it does not exist.
    async fn merge(&self, collection: &str, id: &str, patch: Value) -> AppResult<Option<Value>>;

    /// Delete a document. Returns `true` if it existed.
    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool>;

    /// List every document in a collection as `(id, data)` pairs.
    async fn list(&self, collection: &str) -> AppResult<Vec<(String, Value)>>;

    /// Atomically add `by` to an integer field and return the new value.
    ///
    /// A missing field counts as zero. Returns `None` if the document does
    /// not exist. The increment is atomic with respect to other increments
    /// of the same field, but not with respect to any read the caller did
    /// beforehand.
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        by: i64,
    ) -> AppResult<Option<i64>>;

    /// Open a change subscription on a collection.
    fn subscribe(&self, collection: &str) -> Subscription;
}
