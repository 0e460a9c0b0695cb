//! Notification handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use notenest_entity::Notification;

use crate::dto::request::CreateNotificationRequest;
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// GET /api/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Notification>>>> {
    let items = state.notification_service.list_notifications().await?;
    Ok(Json(ApiResponse::ok(items)))
}

/// POST /api/notifications
pub async fn create_notification(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateNotificationRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Notification>>)> {
    let created = state
        .notification_service
        .create_notification(req.title, req.message)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

/// PUT /api/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Notification>>> {
    let updated = state.notification_service.mark_read(&id).await?;
    Ok(Json(ApiResponse::ok(updated)))
}

/// DELETE /api/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.notification_service.delete_notification(&id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new(
        "Notification deleted",
    ))))
}
