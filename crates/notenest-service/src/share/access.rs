//! Share redemption: validates a token, counts the view, and returns the
//! shared resource.
//!
//! The validity check and the increment are two separate store operations,
//! so concurrent redemptions of the same token can exceed `viewLimit`.
//! Redemption is best-effort, not exactly-once.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use notenest_core::error::AppError;
use notenest_database::repositories::note::NoteRepository;
use notenest_database::repositories::share::ShareRepository;
use notenest_entity::{Document, Note, ResourceType, ShareLink};

use crate::document::DocumentService;

/// The one failure every redemption problem maps to.
pub const INVALID_LINK_MESSAGE: &str = "Invalid or expired share link";

/// What a redeemed link grants access to.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SharedItem {
    /// A note's full content.
    Note {
        /// The shared note.
        note: Note,
    },
    /// A document's metadata and where to fetch it.
    Document {
        /// The shared document.
        document: Document,
        /// Download URL.
        url: String,
    },
}

/// Counter state after a download was recorded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumeResult {
    /// The consumed token.
    pub token: String,
    /// Views recorded, including this one.
    pub view_count: u32,
    /// Views left, or `None` when unlimited.
    pub remaining_views: Option<u32>,
}

/// Handles public redemption of share tokens.
#[derive(Debug, Clone)]
pub struct AccessService {
    /// Share repository.
    share_repo: Arc<ShareRepository>,
    /// Note repository.
    note_repo: Arc<NoteRepository>,
    /// Document service, for metadata and download URLs.
    documents: Arc<DocumentService>,
    /// How long a link that reached its limit lingers before deletion.
    cleanup_delay: Duration,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(
        share_repo: Arc<ShareRepository>,
        note_repo: Arc<NoteRepository>,
        documents: Arc<DocumentService>,
        cleanup_delay: Duration,
    ) -> Self {
        Self {
            share_repo,
            note_repo,
            documents,
            cleanup_delay,
        }
    }

    /// Redeems a token: validates it, records one view, and returns the
    /// shared resource. A link whose limit this view reaches is deleted
    /// after the cleanup delay.
    pub async fn resolve_link(&self, token: &str) -> Result<SharedItem, AppError> {
        let link = self.fetch_valid(token).await?;
        let view_count = self.record_view(token).await?;

        let item = match link.resource_type {
            ResourceType::Note => self
                .note_repo
                .find_by_id(&link.resource_id)
                .await?
                .map(|note| SharedItem::Note { note }),
            ResourceType::Document => match self.documents.get_document(&link.resource_id).await {
                Ok(document) => {
                    let url = self.documents.download_url(&document);
                    Some(SharedItem::Document { document, url })
                }
                Err(e) if e.is_not_found() => None,
                Err(e) => return Err(e),
            },
        };

        let Some(item) = item else {
            warn!(token, resource_id = %link.resource_id, "Share link points at a missing resource");
            self.discard(token).await;
            return Err(invalid_link());
        };

        if link.limit_reached_by(view_count) {
            self.schedule_deletion(token.to_string());
        }

        info!(token, view_count, view_limit = link.view_limit, "Share link resolved");
        Ok(item)
    }

    /// Records a download against a token. Uses the same counter as
    /// [`Self::resolve_link`], so a resolve followed by a download counts
    /// two views. The attempt is counted before validity is checked, so a
    /// download of an exhausted or expired link still bumps `viewCount`
    /// before the link is deleted.
    pub async fn consume_link(&self, token: &str) -> Result<ConsumeResult, AppError> {
        let Some(link) = self.share_repo.find_by_token(token).await? else {
            debug!(token, "Unknown share token");
            return Err(invalid_link());
        };
        let view_count = self.record_view(token).await?;

        if !link.is_valid() {
            debug!(
                token,
                view_count,
                state = ?link.state_at(chrono::Utc::now()),
                "Consumed share link no longer valid"
            );
            self.discard(token).await;
            return Err(invalid_link());
        }

        if link.limit_reached_by(view_count) {
            self.schedule_deletion(token.to_string());
        }

        info!(token, view_count, view_limit = link.view_limit, "Share link consumed");
        Ok(ConsumeResult {
            token: link.token,
            view_count,
            remaining_views: (link.view_limit > 0)
                .then(|| link.view_limit.saturating_sub(view_count)),
        })
    }

    /// Fetches a link and checks it. An invalid link is deleted on sight.
    async fn fetch_valid(&self, token: &str) -> Result<ShareLink, AppError> {
        let Some(link) = self.share_repo.find_by_token(token).await? else {
            debug!(token, "Unknown share token");
            return Err(invalid_link());
        };

        if !link.is_valid() {
            debug!(token, state = ?link.state_at(chrono::Utc::now()), "Share link no longer valid");
            self.discard(token).await;
            return Err(invalid_link());
        }
        Ok(link)
    }

    /// Atomically bumps the counter; a link deleted in between is invalid.
    async fn record_view(&self, token: &str) -> Result<u32, AppError> {
        self.share_repo
            .increment_view_count(token)
            .await?
            .ok_or_else(invalid_link)
    }

    async fn discard(&self, token: &str) {
        if let Err(e) = self.share_repo.delete(token).await {
            warn!(token, error = %e, "Failed to delete invalid share link");
        }
    }

    /// Deletes the link once the cleanup delay has elapsed.
    fn schedule_deletion(&self, token: String) {
        let share_repo = Arc::clone(&self.share_repo);
        let delay = self.cleanup_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            match share_repo.delete(&token).await {
                Ok(true) => info!(token = %token, "Exhausted share link deleted"),
                Ok(false) => debug!(token = %token, "Exhausted share link already gone"),
                Err(e) => warn!(token = %token, error = %e, "Failed to delete exhausted share link"),
            }
        });
    }
}

fn invalid_link() -> AppError {
    AppError::not_found(INVALID_LINK_MESSAGE)
}
