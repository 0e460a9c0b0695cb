//! Cron scheduler for periodic maintenance tasks.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use notenest_core::error::AppError;

use crate::jobs::ShareSweepJob;

/// Cron-based scheduler for periodic background tasks
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler })
    }

    /// Share link sweep on the given six-field cron expression
    pub async fn register_share_sweep(
        &self,
        cron: &str,
        job: Arc<ShareSweepJob>,
    ) -> Result<(), AppError> {
        let cron_job = CronJob::new_async(cron, move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                match job.run().await {
                    Ok(report) => tracing::debug!(%report, "Share sweep finished"),
                    Err(e) => tracing::error!("Share sweep failed: {}", e),
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid share sweep schedule '{cron}': {e}"))
        })?;

        self.scheduler.add(cron_job).await.map_err(|e| {
            AppError::internal(format!("Failed to add share sweep schedule: {e}"))
        })?;

        tracing::info!(cron, "Registered: share_sweep");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use notenest_core::error::ErrorKind;
    use notenest_core::traits::store::DocumentStore;
    use notenest_database::MemoryDocumentStore;
    use notenest_database::repositories::document::DocumentRepository;
    use notenest_database::repositories::note::NoteRepository;
    use notenest_database::repositories::share::ShareRepository;
    use notenest_service::{LinkService, ShareService};

    fn sweep_job() -> Arc<ShareSweepJob> {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::default());
        Arc::new(ShareSweepJob::new(Arc::new(ShareService::new(
            Arc::new(ShareRepository::new(store.clone())),
            Arc::new(NoteRepository::new(store.clone())),
            Arc::new(DocumentRepository::new(store)),
            Arc::new(LinkService::default()),
        ))))
    }

    #[tokio::test]
    async fn test_rejects_bad_cron() {
        let scheduler = CronScheduler::new().await.unwrap();
        let err = scheduler
            .register_share_sweep("every now and then", sweep_job())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_registers_default_schedule() {
        let scheduler = CronScheduler::new().await.unwrap();
        scheduler
            .register_share_sweep("0 */15 * * * *", sweep_job())
            .await
            .unwrap();
    }
}
