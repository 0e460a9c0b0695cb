//! "Why" story repository implementation.

use std::sync::Arc;

use notenest_core::result::AppResult;
use notenest_core::traits::store::DocumentStore;
use notenest_entity::WhyStory;
use notenest_entity::collections::WHY_STORIES;

use super::{decode_all, encode};

/// Repository for portfolio stories.
#[derive(Debug, Clone)]
pub struct StoryRepository {
    store: Arc<dyn DocumentStore>,
}

impl StoryRepository {
    /// Create a new story repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// List stories, oldest first.
    pub async fn find_all(&self) -> AppResult<Vec<WhyStory>> {
        let mut items: Vec<WhyStory> = decode_all(WHY_STORIES, self.store.list(WHY_STORIES).await?);
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(items)
    }

    /// Store a story.
    pub async fn create(&self, story: &WhyStory) -> AppResult<()> {
        self.store.set(WHY_STORIES, &story.id, encode(story)?).await
    }
}
