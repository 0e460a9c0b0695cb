//! Document upload, listing, URL resolution, and download handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;

use notenest_core::error::AppError;
use notenest_entity::Document;
use notenest_service::UploadRequest;

use crate::dto::response::{ApiResponse, MessageResponse, UrlResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/documents
pub async fn list_documents(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<Document>>>> {
    let documents = state.document_service.list_documents().await?;
    Ok(Json(ApiResponse::ok(documents)))
}

/// POST /api/documents (multipart: `file`, optional `title`)
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<Document>>)> {
    let mut title: Option<String> = None;
    let mut file: Option<(String, Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                title = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                file = Some((file_name, content_type, data));
            }
            _ => {}
        }
    }

    let (file_name, content_type, data) =
        file.ok_or_else(|| AppError::validation("file is required"))?;

    let document = state
        .document_service
        .upload(UploadRequest {
            file_name,
            content_type,
            title,
            data,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(document))))
}

/// GET /api/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Document>>> {
    let document = state.document_service.get_document(&id).await?;
    Ok(Json(ApiResponse::ok(document)))
}

/// GET /api/documents/{id}/url
pub async fn document_url(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<UrlResponse>>> {
    let url = state.document_service.resolve_url(&id).await?;
    Ok(Json(ApiResponse::ok(UrlResponse { url })))
}

/// GET /api/documents/{id}/download
pub async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let result = state.document_service.download(&id).await?;
    let document = result.document;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, document.content_type.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "attachment; filename=\"{}\"",
                document.file_name.replace('"', "")
            ),
        )
        .header(header::CONTENT_LENGTH, document.size_bytes)
        .body(Body::from_stream(result.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// DELETE /api/documents/{id}
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    state.document_service.delete_document(&id).await?;
    Ok(Json(ApiResponse::ok(MessageResponse::new("Document deleted"))))
}
