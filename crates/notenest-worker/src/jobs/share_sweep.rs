//! Sweep of expired and exhausted share links.

use std::sync::Arc;

use serde_json::Value;
use tracing;

use notenest_core::error::AppError;
use notenest_service::ShareService;

/// Deletes every share link that can no longer be redeemed.
#[derive(Debug, Clone)]
pub struct ShareSweepJob {
    /// Share service
    share_service: Arc<ShareService>,
}

impl ShareSweepJob {
    /// Create a new sweep job
    pub fn new(share_service: Arc<ShareService>) -> Self {
        Self { share_service }
    }

    /// Run one sweep and report what it removed
    pub async fn run(&self) -> Result<Value, AppError> {
        tracing::debug!("Running share link sweep");
        let removed = self.share_service.sweep_expired().await?;

        Ok(serde_json::json!({
            "task": "share_sweep",
            "share_links_removed": removed,
        }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use notenest_core::traits::store::DocumentStore;
    use notenest_database::MemoryDocumentStore;
    use notenest_database::repositories::document::DocumentRepository;
    use notenest_database::repositories::note::NoteRepository;
    use notenest_database::repositories::share::ShareRepository;
    use notenest_entity::{ResourceType, ShareLink};
    use notenest_service::LinkService;

    use super::*;

    #[tokio::test]
    async fn test_sweep_reports_removed_count() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::default());
        let share_repo = Arc::new(ShareRepository::new(store.clone()));
        let service = Arc::new(ShareService::new(
            share_repo.clone(),
            Arc::new(NoteRepository::new(store.clone())),
            Arc::new(DocumentRepository::new(store)),
            Arc::new(LinkService::default()),
        ));

        let mut stale = ShareLink::new(
            "stale".into(),
            ResourceType::Note,
            "n".into(),
            1,
            0,
            Utc::now(),
        );
        stale.expires_at = Utc::now() - Duration::hours(1);
        share_repo.create(&stale).await.unwrap();

        let job = ShareSweepJob::new(service);
        let report = job.run().await.unwrap();
        assert_eq!(report["share_links_removed"], 1);
        assert_eq!(job.run().await.unwrap()["share_links_removed"], 0);
    }
}
