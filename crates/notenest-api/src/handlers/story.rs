//! "Why" story handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use notenest_entity::WhyStory;

use crate::dto::request::CreateStoryRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// GET /api/stories
pub async fn list_stories(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<WhyStory>>>> {
    let stories = state.site_service.list_stories().await?;
    Ok(Json(ApiResponse::ok(stories)))
}

/// POST /api/stories
pub async fn create_story(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateStoryRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<WhyStory>>)> {
    let story = state
        .site_service
        .create_story(req.title, req.story)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(story))))
}
