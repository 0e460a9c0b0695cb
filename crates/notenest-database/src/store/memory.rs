//! In-memory document store using dashmap.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use notenest_core::error::AppError;
use notenest_core::result::AppResult;
use notenest_core::traits::store::DocumentStore;
use notenest_core::types::change::{ChangeEvent, ChangeFeed, ChangeKind, Subscription};

/// Process-local document store.
///
/// Each collection is one dashmap entry, so a write holds the shard lock of
/// its collection for the duration of the mutation. That is what makes
/// [`DocumentStore::increment`] atomic here.
#[derive(Debug)]
pub struct MemoryDocumentStore {
    /// Collection name → documents by ID.
    collections: DashMap<String, HashMap<String, Value>>,
    /// Change notifications.
    feed: ChangeFeed,
}

impl MemoryDocumentStore {
    /// Create an empty store whose change feed buffers `change_buffer` events.
    pub fn new(change_buffer: usize) -> Self {
        Self {
            collections: DashMap::new(),
            feed: ChangeFeed::new(change_buffer),
        }
    }

    /// Total documents across all collections.
    pub fn len(&self) -> usize {
        self.collections.iter().map(|c| c.value().len()).sum()
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id).cloned()))
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> AppResult<()> {
        let existed = {
            let mut docs = self.collections.entry(collection.to_string()).or_default();
            docs.insert(id.to_string(), data.clone()).is_some()
        };

        let kind = if existed {
            ChangeKind::Updated
        } else {
            ChangeKind::Created
        };
        debug!(collection, id, ?kind, "Stored document");
        self.feed
            .publish(ChangeEvent::new(collection, id, kind, Some(data)));
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, patch: Value) -> AppResult<Option<Value>> {
        let Value::Object(patch) = patch else {
            return Err(AppError::validation("Merge patch must be a JSON object"));
        };

        let merged = {
            let Some(mut docs) = self.collections.get_mut(collection) else {
                return Ok(None);
            };
            let Some(doc) = docs.get_mut(id) else {
                return Ok(None);
            };
            match &mut *doc {
                Value::Object(fields) => fields.extend(patch),
                other => *other = Value::Object(patch),
            }
            doc.clone()
        };

        self.feed.publish(ChangeEvent::new(
            collection,
            id,
            ChangeKind::Updated,
            Some(merged.clone()),
        ));
        Ok(Some(merged))
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool> {
        let removed = self
            .collections
            .get_mut(collection)
            .and_then(|mut docs| docs.remove(id))
            .is_some();

        if removed {
            debug!(collection, id, "Deleted document");
            self.feed
                .publish(ChangeEvent::new(collection, id, ChangeKind::Deleted, None));
        }
        Ok(removed)
    }

    async fn list(&self, collection: &str) -> AppResult<Vec<(String, Value)>> {
        let mut items: Vec<(String, Value)> = self
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| (id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default();
        items.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(items)
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        by: i64,
    ) -> AppResult<Option<i64>> {
        let (value, snapshot) = {
            let Some(mut docs) = self.collections.get_mut(collection) else {
                return Ok(None);
            };
            let Some(Value::Object(fields)) = docs.get_mut(id) else {
                return Ok(None);
            };

            let current = match fields.get(field) {
                None | Some(Value::Null) => 0,
                Some(v) => v.as_i64().ok_or_else(|| {
                    AppError::validation(format!("Field '{field}' is not an integer"))
                })?,
            };
            let next = current.checked_add(by).ok_or_else(|| {
                AppError::validation(format!("Field '{field}' would overflow"))
            })?;
            fields.insert(field.to_string(), Value::from(next));
            (next, Value::Object(fields.clone()))
        };

        self.feed.publish(ChangeEvent::new(
            collection,
            id,
            ChangeKind::Updated,
            Some(snapshot),
        ));
        Ok(Some(value))
    }

    fn subscribe(&self, collection: &str) -> Subscription {
        self.feed.subscribe(collection)
    }
}
