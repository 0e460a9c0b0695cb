//! Share link issuance and public redemption handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use notenest_entity::ShareLink;
use notenest_service::{ConsumeResult, CreateLinkRequest, CreatedLink, SharedItem};

use crate::dto::request::{CreateShareRequest, ListSharesQuery};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// POST /api/shares
pub async fn create_share(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateShareRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CreatedLink>>)> {
    let created = state
        .share_service
        .create_link(CreateLinkRequest {
            resource_id: req.note_id,
            resource_type: req.resource_type,
            expires_in_hours: req.expires_in_hours,
            view_limit: req.view_limit,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(created))))
}

/// GET /api/shares?resourceId=
pub async fn list_shares(
    State(state): State<AppState>,
    Query(query): Query<ListSharesQuery>,
) -> ApiResult<Json<ApiResponse<Vec<ShareLink>>>> {
    let links = state
        .share_service
        .list_links(query.resource_id.as_deref())
        .await?;
    Ok(Json(ApiResponse::ok(links)))
}

/// GET /api/shares/{token}
///
/// Public. Counts one view and returns the shared note or document.
pub async fn resolve_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<ApiResponse<SharedItem>>> {
    let item = state.access_service.resolve_link(&token).await?;
    Ok(Json(ApiResponse::ok(item)))
}

/// POST /api/shares/{token}/consume
///
/// Public. Counts one view when a shared document download starts.
pub async fn consume_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<ApiResponse<ConsumeResult>>> {
    let result = state.access_service.consume_link(&token).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// DELETE /api/shares/{token}
pub async fn revoke_share(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.share_service.revoke_link(&token).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Share link revoked"))))
}
