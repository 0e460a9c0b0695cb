//! Site configuration and realtime command repository.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};

use notenest_core::result::AppResult;
use notenest_core::traits::store::DocumentStore;
use notenest_entity::CommandMetadata;
use notenest_entity::collections::{COMMAND_METADATA_ID, COMMANDS, CONFIG};

use super::{decode, encode};

/// Repository for `config/{key}` values and `commands/metadata`.
#[derive(Debug, Clone)]
pub struct SiteRepository {
    store: Arc<dyn DocumentStore>,
}

impl SiteRepository {
    /// Create a new site repository.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Read a configuration value.
    pub async fn get_config(&self, key: &str) -> AppResult<Option<Value>> {
        Ok(self
            .store
            .get(CONFIG, key)
            .await?
            .and_then(|mut doc| doc.get_mut("value").map(Value::take)))
    }

    /// Write a configuration value.
    pub async fn set_config(&self, key: &str, value: Value) -> AppResult<()> {
        self.store
            .set(
                CONFIG,
                key,
                json!({ "value": value, "updatedAt": Utc::now() }),
            )
            .await
    }

    /// Read the realtime command document.
    pub async fn get_command_metadata(&self) -> AppResult<Option<CommandMetadata>> {
        self.store
            .get(COMMANDS, COMMAND_METADATA_ID)
            .await?
            .map(|v| decode(COMMANDS, COMMAND_METADATA_ID, v))
            .transpose()
    }

    /// Replace the realtime command document.
    pub async fn set_command_metadata(&self, metadata: &CommandMetadata) -> AppResult<()> {
        self.store
            .set(COMMANDS, COMMAND_METADATA_ID, encode(metadata)?)
            .await
    }
}
