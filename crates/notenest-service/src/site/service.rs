//! Site configuration, realtime command, and story service.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info};

use notenest_core::error::AppError;
use notenest_database::repositories::site::SiteRepository;
use notenest_database::repositories::story::StoryRepository;
use notenest_entity::{CommandMetadata, WhyStory};

/// Longest accepted configuration key.
const MAX_KEY_LEN: usize = 128;

/// Manages the portfolio's editable content.
#[derive(Debug, Clone)]
pub struct SiteService {
    /// Config and command repository.
    site_repo: Arc<SiteRepository>,
    /// Story repository.
    story_repo: Arc<StoryRepository>,
}

impl SiteService {
    /// Creates a new site service.
    pub fn new(site_repo: Arc<SiteRepository>, story_repo: Arc<StoryRepository>) -> Self {
        Self {
            site_repo,
            story_repo,
        }
    }

    /// Reads a configuration value.
    pub async fn get_config(&self, key: &str) -> Result<Value, AppError> {
        validate_key(key)?;
        self.site_repo
            .get_config(key)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Config key '{key}' not found")))
    }

    /// Writes a configuration value.
    pub async fn set_config(&self, key: &str, value: Value) -> Result<Value, AppError> {
        validate_key(key)?;
        self.site_repo.set_config(key, value.clone()).await?;
        debug!(key, "Config value updated");
        Ok(value)
    }

    /// Reads the realtime command document, if one was ever written.
    pub async fn get_command_metadata(&self) -> Result<Option<CommandMetadata>, AppError> {
        self.site_repo.get_command_metadata().await
    }

    /// Replaces the realtime command document. Subscribers of `commands` see the change.
    pub async fn set_command_metadata(&self, payload: Value) -> Result<CommandMetadata, AppError> {
        let metadata = CommandMetadata {
            payload,
            updated_at: Utc::now(),
        };
        self.site_repo.set_command_metadata(&metadata).await?;
        Ok(metadata)
    }

    /// Lists stories, oldest first.
    pub async fn list_stories(&self) -> Result<Vec<WhyStory>, AppError> {
        self.story_repo.find_all().await
    }

    /// Adds a story.
    pub async fn create_story(&self, title: String, story: String) -> Result<WhyStory, AppError> {
        if title.trim().is_empty() || story.trim().is_empty() {
            return Err(AppError::validation("Story title and text are required"));
        }

        let story = WhyStory {
            id: notenest_entity::new_id(),
            title,
            story,
            created_at: Utc::now(),
        };
        self.story_repo.create(&story).await?;

        info!(story_id = %story.id, "Story created");
        Ok(story)
    }
}

fn validate_key(key: &str) -> Result<(), AppError> {
    let ok = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if ok {
        Ok(())
    } else {
        Err(AppError::validation(format!("Invalid config key '{key}'")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use notenest_core::error::ErrorKind;
    use notenest_core::traits::store::DocumentStore;
    use notenest_database::MemoryDocumentStore;

    use super::*;

    fn service() -> SiteService {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::default());
        SiteService::new(
            Arc::new(SiteRepository::new(store.clone())),
            Arc::new(StoryRepository::new(store)),
        )
    }

    #[tokio::test]
    async fn test_config_round_trip() {
        let service = service();
        assert!(service.get_config("hero").await.unwrap_err().is_not_found());

        service
            .set_config("hero", json!({"headline": "Hi"}))
            .await
            .unwrap();
        assert_eq!(
            service.get_config("hero").await.unwrap(),
            json!({"headline": "Hi"})
        );

        let err = service.set_config("../x", json!(1)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_command_metadata() {
        let service = service();
        assert!(service.get_command_metadata().await.unwrap().is_none());

        service
            .set_command_metadata(json!({"command": "refresh"}))
            .await
            .unwrap();
        let stored = service.get_command_metadata().await.unwrap().unwrap();
        assert_eq!(stored.payload["command"], "refresh");
    }

    #[tokio::test]
    async fn test_stories() {
        let service = service();
        service
            .create_story("Why Rust".into(), "Because.".into())
            .await
            .unwrap();
        assert!(service.create_story("".into(), "x".into()).await.is_err());
        assert_eq!(service.list_stories().await.unwrap().len(), 1);
    }
}
