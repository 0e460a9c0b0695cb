//! Notification repository implementation.

use std::sync::Arc;

use serde_json::json;

use notenest_core::result::AppResult;
use notenest_core::traits::store::DocumentStore;
use notenest_entity::Notification;
use notenest_entity::collections::NOTIFICATIONS;

use super::{decode, decode_all, encode};

/// Repository for site notifications.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    store: Arc<dyn DocumentStore>,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// List notifications, newest first.
    pub async fn find_all(&self) -> AppResult<Vec<Notification>> {
        let mut items: Vec<Notification> =
            decode_all(NOTIFICATIONS, self.store.list(NOTIFICATIONS).await?);
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    /// Store a notification.
    pub async fn create(&self, notification: &Notification) -> AppResult<()> {
        self.store
            .set(NOTIFICATIONS, &notification.id, encode(notification)?)
            .await
    }

    /// Mark a notification read. Returns `None` if it does not exist.
    pub async fn mark_read(&self, id: &str) -> AppResult<Option<Notification>> {
        self.store
            .merge(NOTIFICATIONS, id, json!({ "read": true }))
            .await?
            .map(|v| decode(NOTIFICATIONS, id, v))
            .transpose()
    }

    /// Delete a notification.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        self.store.delete(NOTIFICATIONS, id).await
    }
}
