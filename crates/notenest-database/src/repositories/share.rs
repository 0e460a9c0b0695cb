//! Share link repository implementation.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use notenest_core::result::AppResult;
use notenest_core::traits::store::DocumentStore;
use notenest_entity::ShareLink;
use notenest_entity::collections::SHARED_NOTE_LINKS;

use super::{decode, decode_all, encode};

/// Repository for share links, keyed by token.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    store: Arc<dyn DocumentStore>,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Find a link by token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<ShareLink>> {
        self.store
            .get(SHARED_NOTE_LINKS, token)
            .await?
            .map(|v| decode(SHARED_NOTE_LINKS, token, v))
            .transpose()
    }

    /// List every link, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<ShareLink>> {
        let mut links: Vec<ShareLink> =
            decode_all(SHARED_NOTE_LINKS, self.store.list(SHARED_NOTE_LINKS).await?);
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }

    /// List links pointing at one resource.
    pub async fn find_by_resource(&self, resource_id: &str) -> AppResult<Vec<ShareLink>> {
        Ok(self
            .find_all()
            .await?
            .into_iter()
            .filter(|link| link.resource_id == resource_id)
            .collect())
    }

    /// Store a new link.
    pub async fn create(&self, link: &ShareLink) -> AppResult<()> {
        self.store
            .set(SHARED_NOTE_LINKS, &link.token, encode(link)?)
            .await
    }

    /// Add one view and return the new count, or `None` if the link is gone.
    pub async fn increment_view_count(&self, token: &str) -> AppResult<Option<u32>> {
        let count = self
            .store
            .increment(SHARED_NOTE_LINKS, token, ShareLink::VIEW_COUNT_FIELD, 1)
            .await?;
        Ok(count.map(|c| u32::try_from(c).unwrap_or(u32::MAX)))
    }

    /// Delete a link.
    pub async fn delete(&self, token: &str) -> AppResult<bool> {
        self.store.delete(SHARED_NOTE_LINKS, token).await
    }

    /// Delete every link pointing at one resource. Returns how many were removed.
    pub async fn delete_by_resource(&self, resource_id: &str) -> AppResult<u64> {
        let mut removed = 0;
        for link in self.find_by_resource(resource_id).await? {
            if self.delete(&link.token).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Delete every link that is invalid at `now`. Returns how many were removed.
    pub async fn delete_invalid(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut removed = 0;
        for link in self.find_all().await? {
            if !link.is_valid_at(now) && self.delete(&link.token).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}
