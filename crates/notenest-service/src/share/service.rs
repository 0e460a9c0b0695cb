//! Share link issuance, listing, revocation, and sweeping.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use notenest_core::error::AppError;
use notenest_database::repositories::document::DocumentRepository;
use notenest_database::repositories::note::NoteRepository;
use notenest_database::repositories::share::ShareRepository;
use notenest_entity::{ResourceType, ShareLink};

use super::link::LinkService;

/// Attempts at finding an unused token before giving up.
const TOKEN_ATTEMPTS: usize = 3;

/// Request to share a note or document.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLinkRequest {
    /// ID of the resource to share.
    pub resource_id: String,
    /// Kind of the resource.
    pub resource_type: ResourceType,
    /// Hours until expiry; 0 means permanent.
    pub expires_in_hours: u32,
    /// Maximum views; 0 means unlimited.
    pub view_limit: u32,
}

/// A newly issued link and its public URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedLink {
    /// URL embedding the token.
    pub url: String,
    /// The stored link.
    pub link: ShareLink,
}

/// Manages the owner side of share links.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// Share repository.
    share_repo: Arc<ShareRepository>,
    /// Note repository, to check the shared note exists.
    note_repo: Arc<NoteRepository>,
    /// Document repository, to check the shared document exists.
    doc_repo: Arc<DocumentRepository>,
    /// Token generation.
    link_service: Arc<LinkService>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        share_repo: Arc<ShareRepository>,
        note_repo: Arc<NoteRepository>,
        doc_repo: Arc<DocumentRepository>,
        link_service: Arc<LinkService>,
    ) -> Self {
        Self {
            share_repo,
            note_repo,
            doc_repo,
            link_service,
        }
    }

    /// Issues a link with `viewCount = 0` and returns its URL.
    pub async fn create_link(&self, req: CreateLinkRequest) -> Result<CreatedLink, AppError> {
        let exists = match req.resource_type {
            ResourceType::Note => self.note_repo.find_by_id(&req.resource_id).await?.is_some(),
            ResourceType::Document => self.doc_repo.find_by_id(&req.resource_id).await?.is_some(),
        };
        if !exists {
            return Err(AppError::not_found(format!(
                "Cannot share missing resource {}",
                req.resource_id
            )));
        }

        let token = self.unused_token().await?;
        let link = ShareLink::new(
            token,
            req.resource_type,
            req.resource_id,
            req.expires_in_hours,
            req.view_limit,
            Utc::now(),
        );
        self.share_repo.create(&link).await?;

        info!(
            token = %link.token,
            resource_id = %link.resource_id,
            resource_type = ?link.resource_type,
            expires_at = %link.expires_at,
            view_limit = link.view_limit,
            "Share link created"
        );
        Ok(CreatedLink {
            url: self.link_service.build_url(&link.token),
            link,
        })
    }

    /// Lists links, optionally only those for one resource.
    pub async fn list_links(&self, resource_id: Option<&str>) -> Result<Vec<ShareLink>, AppError> {
        match resource_id {
            Some(id) => self.share_repo.find_by_resource(id).await,
            None => self.share_repo.find_all().await,
        }
    }

    /// Deletes a link so its token stops working.
    pub async fn revoke_link(&self, token: &str) -> Result<(), AppError> {
        if !self.share_repo.delete(token).await? {
            return Err(AppError::not_found("Share link not found"));
        }
        info!(token, "Share link revoked");
        Ok(())
    }

    /// Deletes every link that is expired or exhausted.
    pub async fn sweep_expired(&self) -> Result<u64, AppError> {
        let removed = self.share_repo.delete_invalid(Utc::now()).await?;
        if removed > 0 {
            info!(removed, "Swept invalid share links");
        }
        Ok(removed)
    }

    async fn unused_token(&self) -> Result<String, AppError> {
        for _ in 0..TOKEN_ATTEMPTS {
            let token = self.link_service.generate_token();
            if self.share_repo.find_by_token(&token).await?.is_none() {
                return Ok(token);
            }
        }
        Err(AppError::conflict("Could not allocate a unique share token"))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use notenest_core::traits::store::DocumentStore;
    use notenest_database::MemoryDocumentStore;
    use notenest_entity::Note;

    use super::*;

    struct Fixture {
        service: ShareService,
        share_repo: Arc<ShareRepository>,
        note: Note,
    }

    async fn fixture() -> Fixture {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::default());
        let share_repo = Arc::new(ShareRepository::new(store.clone()));
        let note_repo = Arc::new(NoteRepository::new(store.clone()));
        let note = Note::new("n".into(), "c".into(), vec![]);
        note_repo.save(&note).await.unwrap();

        let service = ShareService::new(
            share_repo.clone(),
            note_repo,
            Arc::new(DocumentRepository::new(store)),
            Arc::new(LinkService::new("https://site.dev", 20)),
        );
        Fixture {
            service,
            share_repo,
            note,
        }
    }

    fn request(resource_id: &str, hours: u32, limit: u32) -> CreateLinkRequest {
        CreateLinkRequest {
            resource_id: resource_id.to_string(),
            resource_type: ResourceType::Note,
            expires_in_hours: hours,
            view_limit: limit,
        }
    }

    #[tokio::test]
    async fn test_create_link() {
        let f = fixture().await;
        let created = f.service.create_link(request(&f.note.id, 24, 1)).await.unwrap();

        assert_eq!(created.link.view_count, 0);
        assert_eq!(created.link.token.len(), 20);
        assert_eq!(
            created.url,
            format!("https://site.dev/share/{}", created.link.token)
        );
        let hours = (created.link.expires_at - created.link.created_at).num_hours();
        assert_eq!(hours, 24);
    }

    #[tokio::test]
    async fn test_create_permanent_link() {
        let f = fixture().await;
        let created = f.service.create_link(request(&f.note.id, 0, 0)).await.unwrap();
        assert!(created.link.is_permanent());
    }

    #[tokio::test]
    async fn test_create_link_with_huge_expiry_is_permanent() {
        let f = fixture().await;
        let created = f
            .service
            .create_link(request(&f.note.id, u32::MAX, 0))
            .await
            .unwrap();
        assert!(created.link.is_permanent());
        assert!(created.link.is_valid());
    }

    #[tokio::test]
    async fn test_cannot_share_missing_note() {
        let f = fixture().await;
        let err = f.service.create_link(request("ghost", 1, 1)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_and_revoke() {
        let f = fixture().await;
        let a = f.service.create_link(request(&f.note.id, 1, 0)).await.unwrap();
        f.service.create_link(request(&f.note.id, 1, 0)).await.unwrap();

        assert_eq!(f.service.list_links(Some(&f.note.id)).await.unwrap().len(), 2);
        assert!(f.service.list_links(Some("other")).await.unwrap().is_empty());

        f.service.revoke_link(&a.link.token).await.unwrap();
        assert_eq!(f.service.list_links(None).await.unwrap().len(), 1);
        assert!(f.service.revoke_link(&a.link.token).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_sweep_removes_only_invalid() {
        let f = fixture().await;
        let live = f.service.create_link(request(&f.note.id, 1, 0)).await.unwrap();

        let mut expired = live.link.clone();
        expired.token = "expired".into();
        expired.expires_at = Utc::now() - Duration::seconds(1);
        f.share_repo.create(&expired).await.unwrap();

        let mut exhausted = live.link.clone();
        exhausted.token = "exhausted".into();
        exhausted.view_limit = 2;
        exhausted.view_count = 2;
        f.share_repo.create(&exhausted).await.unwrap();

        assert_eq!(f.service.sweep_expired().await.unwrap(), 2);
        let left = f.service.list_links(None).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].token, live.link.token);
    }
}
