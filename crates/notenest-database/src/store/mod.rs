//! Document store backends.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use notenest_core::config::{DatabaseConfig, StoreProvider};
use notenest_core::error::{AppError, ErrorKind};
use notenest_core::result::AppResult;
use notenest_core::traits::store::DocumentStore;

pub use memory::MemoryDocumentStore;
pub use postgres::PostgresDocumentStore;

/// Build the configured document store.
///
/// The PostgreSQL backend creates the `records` table and the index used to
/// find links by shared resource before returning.
pub async fn connect(config: &DatabaseConfig) -> AppResult<Arc<dyn DocumentStore>> {
    match config.provider {
        StoreProvider::Memory => {
            info!("Using in-memory document store");
            Ok(Arc::new(MemoryDocumentStore::new(config.change_buffer)))
        }
        StoreProvider::Postgres => {
            let store = PostgresDocumentStore::connect(config).await?;
            migrate_records(store.pool()).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Applies `migrations/` so every collection has its JSONB row layout.
async fn migrate_records(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to migrate records table: {e}"),
                e,
            )
        })?;
    info!("Records table is up to date");
    Ok(())
}
