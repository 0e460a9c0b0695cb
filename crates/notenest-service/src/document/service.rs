//! Document upload, URL resolution, and download service.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};

use notenest_core::error::AppError;
use notenest_core::traits::storage::{ByteStream, StorageProvider};
use notenest_database::repositories::document::DocumentRepository;
use notenest_database::repositories::share::ShareRepository;
use notenest_entity::Document;
use notenest_storage::mime;

/// A file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Original file name.
    pub file_name: String,
    /// MIME type reported by the client, if any.
    pub content_type: Option<String>,
    /// Display title; defaults to the file name.
    pub title: Option<String>,
    /// File content.
    pub data: Bytes,
}

/// Document metadata plus a stream of its bytes.
pub struct DownloadResult {
    /// Document metadata.
    pub document: Document,
    /// File content.
    pub stream: ByteStream,
}

impl std::fmt::Debug for DownloadResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadResult")
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

/// Proxies uploads to object storage and keeps their metadata.
#[derive(Clone)]
pub struct DocumentService {
    /// Metadata repository.
    doc_repo: Arc<DocumentRepository>,
    /// Share repository, for cascading deletes.
    share_repo: Arc<ShareRepository>,
    /// Object storage.
    storage: Arc<dyn StorageProvider>,
    /// Public origin for stored objects; empty means "serve via the API".
    public_base_url: String,
    /// Upload size ceiling.
    max_upload_size_bytes: u64,
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentService")
            .field("storage", &self.storage.provider_type())
            .finish()
    }
}

impl DocumentService {
    /// Creates a new document service.
    pub fn new(
        doc_repo: Arc<DocumentRepository>,
        share_repo: Arc<ShareRepository>,
        storage: Arc<dyn StorageProvider>,
        public_base_url: impl Into<String>,
        max_upload_size_bytes: u64,
    ) -> Self {
        Self {
            doc_repo,
            share_repo,
            storage,
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            max_upload_size_bytes,
        }
    }

    /// Lists documents, newest first.
    pub async fn list_documents(&self) -> Result<Vec<Document>, AppError> {
        self.doc_repo.find_all().await
    }

    /// Gets document metadata by ID.
    pub async fn get_document(&self, id: &str) -> Result<Document, AppError> {
        self.doc_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Document {id} not found")))
    }

    /// Stores the bytes, then the metadata. A failed metadata write removes the object.
    pub async fn upload(&self, req: UploadRequest) -> Result<Document, AppError> {
        let file_name = sanitize_file_name(&req.file_name);
        if file_name.is_empty() {
            return Err(AppError::validation("Uploaded file must have a name"));
        }
        if req.data.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        let size_bytes = req.data.len() as u64;
        if size_bytes > self.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the maximum upload size of {} bytes",
                self.max_upload_size_bytes
            )));
        }

        let content_type = req
            .content_type
            .filter(|ct| !ct.trim().is_empty())
            .unwrap_or_else(|| mime::guess_or_default(&file_name).to_string());
        let title = req
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| file_name.clone());

        let id = notenest_entity::new_id();
        let storage_key = format!("documents/{id}/{file_name}");
        self.storage.write(&storage_key, req.data).await?;

        let document = Document {
            id,
            title,
            file_name,
            content_type,
            size_bytes,
            storage_key,
            created_at: Utc::now(),
        };
        if let Err(e) = self.doc_repo.create(&document).await {
            if let Err(cleanup) = self.storage.delete(&document.storage_key).await {
                warn!(key = %document.storage_key, error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e);
        }

        info!(
            document_id = %document.id,
            size = document.size_bytes,
            content_type = %document.content_type,
            "Document uploaded"
        );
        Ok(document)
    }

    /// Resolves the URL a browser should fetch the document from.
    pub fn download_url(&self, document: &Document) -> String {
        if self.public_base_url.is_empty() {
            format!("/api/documents/{}/download", document.id)
        } else {
            format!("{}/{}", self.public_base_url, document.storage_key)
        }
    }

    /// Looks up a document and resolves its URL.
    pub async fn resolve_url(&self, id: &str) -> Result<String, AppError> {
        let document = self.get_document(id).await?;
        Ok(self.download_url(&document))
    }

    /// Opens the document's bytes for streaming.
    pub async fn download(&self, id: &str) -> Result<DownloadResult, AppError> {
        let document = self.get_document(id).await?;
        let stream = self.storage.read(&document.storage_key).await?;
        Ok(DownloadResult { document, stream })
    }

    /// Deletes the metadata, the stored object, and the document's share links.
    pub async fn delete_document(&self, id: &str) -> Result<(), AppError> {
        let document = self.get_document(id).await?;
        self.doc_repo.delete(id).await?;

        if let Err(e) = self.storage.delete(&document.storage_key).await {
            warn!(key = %document.storage_key, error = %e, "Failed to delete stored object");
        }
        let links = self.share_repo.delete_by_resource(id).await?;

        info!(document_id = %id, share_links_removed = links, "Document deleted");
        Ok(())
    }
}

/// Keep only the final path segment and drop characters unsafe in storage keys.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or_default();
    base.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .trim_start_matches('.')
        .to_string()
}
