//! Site configuration and realtime command handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde_json::Value;

use notenest_entity::CommandMetadata;

use crate::dto::request::{SetCommandRequest, SetConfigRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// GET /api/config/{key}
pub async fn get_config(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let value = state.site_service.get_config(&key).await?;
    Ok(Json(ApiResponse::ok(value)))
}

/// PUT /api/config/{key}
pub async fn set_config(
    State(state): State<AppState>,
    Path(key): Path<String>,
    ValidatedJson(req): ValidatedJson<SetConfigRequest>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    let value = state.site_service.set_config(&key, req.value).await?;
    Ok(Json(ApiResponse::ok(value)))
}

/// GET /api/commands/metadata
pub async fn get_command_metadata(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Option<CommandMetadata>>>> {
    let metadata = state.site_service.get_command_metadata().await?;
    Ok(Json(ApiResponse::ok(metadata)))
}

/// PUT /api/commands/metadata
pub async fn set_command_metadata(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<SetCommandRequest>,
) -> ApiResult<Json<ApiResponse<CommandMetadata>>> {
    let metadata = state.site_service.set_command_metadata(req.payload).await?;
    Ok(Json(ApiResponse::ok(metadata)))
}
