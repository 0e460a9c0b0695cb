//! Note CRUD handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use notenest_entity::Note;
use notenest_service::note;

use crate::dto::request::{CreateNoteRequest, UpdateNoteRequest};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// GET /api/notes
pub async fn list_notes(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<Note>>>> {
    let notes = state.note_service.list_notes().await?;
    Ok(Json(ApiResponse::ok(notes)))
}

/// POST /api/notes
pub async fn create_note(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateNoteRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Note>>)> {
    let note = state
        .note_service
        .create_note(note::CreateNoteRequest {
            title: req.title,
            content: req.content,
            tags: req.tags,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(note))))
}

/// GET /api/notes/{id}
pub async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Note>>> {
    let note = state.note_service.get_note(&id).await?;
    Ok(Json(ApiResponse::ok(note)))
}

/// PUT /api/notes/{id}
pub async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateNoteRequest>,
) -> ApiResult<Json<ApiResponse<Note>>> {
    let note = state
        .note_service
        .update_note(
            &id,
            note::UpdateNoteRequest {
                title: req.title,
                content: req.content,
                tags: req.tags,
            },
        )
        .await?;
    Ok(Json(ApiResponse::ok(note)))
}

/// DELETE /api/notes/{id}
pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.note_service.delete_note(&id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Note deleted"))))
}
