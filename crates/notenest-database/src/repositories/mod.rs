//! Typed repositories over the injected document store.

pub mod document;
pub mod note;
pub mod notification;
pub mod share;
pub mod site;
pub mod story;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use notenest_core::error::{AppError, ErrorKind};
use notenest_core::result::AppResult;

/// Decode a stored document into an entity.
pub(crate) fn decode<T: DeserializeOwned>(collection: &str, id: &str, value: Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|e| {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("Malformed document {collection}/{id}"),
            e,
        )
    })
}

/// Encode an entity for storage.
pub(crate) fn encode<T: Serialize>(entity: &T) -> AppResult<Value> {
    Ok(serde_json::to_value(entity)?)
}

/// Decode every document in a listing, skipping (and logging) malformed ones.
pub(crate) fn decode_all<T: DeserializeOwned>(collection: &str, items: Vec<(String, Value)>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|(id, value)| match decode(collection, &id, value) {
            Ok(entity) => Some(entity),
            Err(e) => {
                tracing::warn!(collection, id = %id, error = %e, "Skipping malformed document");
                None
            }
        })
        .collect()
}
