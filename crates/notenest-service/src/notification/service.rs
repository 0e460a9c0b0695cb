//! Notification CRUD service.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use notenest_core::error::AppError;
use notenest_database::repositories::notification::NotificationRepository;
use notenest_entity::Notification;

/// Manages site notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification repository.
    notif_repo: Arc<NotificationRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notif_repo: Arc<NotificationRepository>) -> Self {
        Self { notif_repo }
    }

    /// Lists notifications, newest first.
    pub async fn list_notifications(&self) -> Result<Vec<Notification>, AppError> {
        self.notif_repo.find_all().await
    }

    /// Creates an unread notification.
    pub async fn create_notification(
        &self,
        title: String,
        message: String,
    ) -> Result<Notification, AppError> {
        if title.trim().is_empty() {
            return Err(AppError::validation("Notification title must not be empty"));
        }

        let notification = Notification {
            id: notenest_entity::new_id(),
            title,
            message,
            read: false,
            created_at: Utc::now(),
        };
        self.notif_repo.create(&notification).await?;

        info!(notification_id = %notification.id, "Notification created");
        Ok(notification)
    }

    /// Marks a notification as read.
    pub async fn mark_read(&self, id: &str) -> Result<Notification, AppError> {
        self.notif_repo
            .mark_read(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))
    }

    /// Deletes a notification.
    pub async fn delete_notification(&self, id: &str) -> Result<(), AppError> {
        if !self.notif_repo.delete(id).await? {
            return Err(AppError::not_found(format!("Notification {id} not found")));
        }
        Ok(())
    }
}
