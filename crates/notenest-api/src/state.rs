//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use notenest_core::config::AppConfig;
use notenest_core::traits::storage::StorageProvider;
use notenest_core::traits::store::DocumentStore;
use notenest_service::{
    AccessService, DocumentService, NoteService, NotificationService, ShareService, SiteService,
    SpotifyClient,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// When the state was built
    pub started_at: Instant,

    // ── Capabilities ─────────────────────────────────────────
    /// Document store (also the realtime change feed)
    pub store: Arc<dyn DocumentStore>,
    /// Object storage for uploads
    pub storage: Arc<dyn StorageProvider>,
    /// Spotify Web API client
    pub spotify: Arc<SpotifyClient>,

    // ── Services ─────────────────────────────────────────────
    /// Note CRUD
    pub note_service: Arc<NoteService>,
    /// Document upload and download
    pub document_service: Arc<DocumentService>,
    /// Share link issuance
    pub share_service: Arc<ShareService>,
    /// Share link redemption
    pub access_service: Arc<AccessService>,
    /// Notifications
    pub notification_service: Arc<NotificationService>,
    /// Config, commands, stories
    pub site_service: Arc<SiteService>,
}
