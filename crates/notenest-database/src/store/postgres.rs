//! PostgreSQL document store: one JSONB row per document.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use tracing::{debug, info};

use notenest_core::config::DatabaseConfig;
use notenest_core::error::{AppError, ErrorKind};
use notenest_core::result::AppResult;
use notenest_core::traits::store::DocumentStore;
use notenest_core::types::change::{ChangeEvent, ChangeFeed, ChangeKind, Subscription};

/// Document store backed by the `records` table.
///
/// Change events are published in-process after each successful write, so
/// subscribers only observe writes made through this instance.
#[derive(Debug, Clone)]
pub struct PostgresDocumentStore {
    /// The underlying sqlx connection pool.
    pool: PgPool,
    /// Change notifications.
    feed: ChangeFeed,
}

impl PostgresDocumentStore {
    /// Create a new pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        info!(
            url = %mask_password(&config.url),
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to connect to database: {e}"),
                    e,
                )
            })?;

        info!("Successfully connected to PostgreSQL");
        Ok(Self::from_pool(pool, config.change_buffer))
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool, change_buffer: usize) -> Self {
        Self {
            pool,
            feed: ChangeFeed::new(change_buffer),
        }
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    fn provider_type(&self) -> &str {
        "postgres"
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<Value>> {
        let row: Option<Json<Value>> =
            sqlx::query_scalar("SELECT data FROM records WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to fetch document", e)
                })?;
        Ok(row.map(|Json(v)| v))
    }

    async fn set(&self, collection: &str, id: &str, data: Value) -> AppResult<()> {
        // xmax is zero only for rows created by this statement.
        let inserted: bool = sqlx::query_scalar(
            "INSERT INTO records (collection, id, data) VALUES ($1, $2, $3) \
             ON CONFLICT (collection, id) DO UPDATE SET data = EXCLUDED.data, updated_at = NOW() \
             RETURNING (xmax = 0)",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&data))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to store document", e))?;

        let kind = if inserted {
            ChangeKind::Created
        } else {
            ChangeKind::Updated
        };
        debug!(collection, id, ?kind, "Stored document");
        self.feed
            .publish(ChangeEvent::new(collection, id, kind, Some(data)));
        Ok(())
    }

    async fn merge(&self, collection: &str, id: &str, patch: Value) -> AppResult<Option<Value>> {
        if !patch.is_object() {
            return Err(AppError::validation("Merge patch must be a JSON object"));
        }

        let merged: Option<Json<Value>> = sqlx::query_scalar(
            "UPDATE records SET data = data || $3, updated_at = NOW() \
             WHERE collection = $1 AND id = $2 RETURNING data",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&patch))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to merge document", e))?;

        let merged = merged.map(|Json(v)| v);
        if let Some(ref data) = merged {
            self.feed.publish(ChangeEvent::new(
                collection,
                id,
                ChangeKind::Updated,
                Some(data.clone()),
            ));
        }
        Ok(merged)
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM records WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete document", e)
            })?;

        let removed = result.rows_affected() > 0;
        if removed {
            self.feed
                .publish(ChangeEvent::new(collection, id, ChangeKind::Deleted, None));
        }
        Ok(removed)
    }

    async fn list(&self, collection: &str) -> AppResult<Vec<(String, Value)>> {
        let rows: Vec<(String, Json<Value>)> =
            sqlx::query_as("SELECT id, data FROM records WHERE collection = $1 ORDER BY id")
                .bind(collection)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list documents", e)
                })?;
        Ok(rows.into_iter().map(|(id, Json(data))| (id, data)).collect())
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        by: i64,
    ) -> AppResult<Option<i64>> {
        let row: Option<Json<Value>> = sqlx::query_scalar(
            "UPDATE records SET \
             data = jsonb_set(data, ARRAY[$3::text], to_jsonb(COALESCE((data->>$3)::bigint, 0) + $4::bigint)), \
             updated_at = NOW() \
             WHERE collection = $1 AND id = $2 RETURNING data",
        )
        .bind(collection)
        .bind(id)
        .bind(field)
        .bind(by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to increment field", e)
        })?;

        let Some(Json(data)) = row else {
            return Ok(None);
        };
        let value = data.get(field).and_then(Value::as_i64).ok_or_else(|| {
            AppError::database(format!("Field '{field}' missing after increment"))
        })?;

        self.feed.publish(ChangeEvent::new(
            collection,
            id,
            ChangeKind::Updated,
            Some(data),
        ));
        Ok(Some(value))
    }

    fn subscribe(&self, collection: &str) -> Subscription {
        self.feed.subscribe(collection)
    }
}

/// Mask the password portion of a database URL for safe logging.
fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
