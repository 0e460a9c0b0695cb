//! Document metadata repository implementation.

use std::sync::Arc;

use notenest_core::result::AppResult;
use notenest_core::traits::store::DocumentStore;
use notenest_entity::Document;
use notenest_entity::collections::DOCUMENTS;

use super::{decode, decode_all, encode};

/// Repository for uploaded document metadata.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find a document by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Document>> {
        self.store
            .get(DOCUMENTS, id)
            .await?
            .map(|v| decode(DOCUMENTS, id, v))
            .transpose()
    }

    /// List all documents, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<Document>> {
        let mut docs: Vec<Document> = decode_all(DOCUMENTS, self.store.list(DOCUMENTS).await?);
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(docs)
    }

    /// Store document metadata.
    pub async fn create(&self, document: &Document) -> AppResult<()> {
        self.store
            .set(DOCUMENTS, &document.id, encode(document)?)
            .await
    }

    /// Delete document metadata.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        self.store.delete(DOCUMENTS, id).await
    }
}
