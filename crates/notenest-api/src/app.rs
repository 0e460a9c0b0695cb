//! Application builder: wires capabilities, services, and the router.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;

use notenest_core::config::AppConfig;
use notenest_core::error::AppError;
use notenest_core::result::AppResult;
use notenest_core::traits::storage::StorageProvider;
use notenest_core::traits::store::DocumentStore;
use notenest_database::repositories::{document, note, notification, share, site, story};
use notenest_service::share::LinkService;
use notenest_service::{
    AccessService, DocumentService, NoteService, NotificationService, ShareService, SiteService,
    SpotifyClient,
};
use notenest_storage::LocalStorageProvider;
use notenest_worker::{CronScheduler, ShareSweepJob};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the application state around the injected store and storage.
pub fn build_state(
    config: AppConfig,
    store: Arc<dyn DocumentStore>,
    storage: Arc<dyn StorageProvider>,
) -> AppResult<AppState> {
    // ── Repositories ─────────────────────────────────────────────
    let note_repo = Arc::new(note::NoteRepository::new(Arc::clone(&store)));
    let doc_repo = Arc::new(document::DocumentRepository::new(Arc::clone(&store)));
    let share_repo = Arc::new(share::ShareRepository::new(Arc::clone(&store)));
    let notif_repo = Arc::new(notification::NotificationRepository::new(Arc::clone(&store)));
    let site_repo = Arc::new(site::SiteRepository::new(Arc::clone(&store)));
    let story_repo = Arc::new(story::StoryRepository::new(Arc::clone(&store)));

    // ── Services ─────────────────────────────────────────────────
    let note_service = Arc::new(NoteService::new(
        Arc::clone(&note_repo),
        Arc::clone(&share_repo),
    ));
    let document_service = Arc::new(DocumentService::new(
        Arc::clone(&doc_repo),
        Arc::clone(&share_repo),
        Arc::clone(&storage),
        config.storage.public_base_url.clone(),
        config.storage.max_upload_size_bytes,
    ));
    let link_service = Arc::new(LinkService::new(
        config.share.base_url.clone(),
        config.share.token_length,
    ));
    let share_service = Arc::new(ShareService::new(
        Arc::clone(&share_repo),
        Arc::clone(&note_repo),
        Arc::clone(&doc_repo),
        link_service,
    ));
    let access_service = Arc::new(AccessService::new(
        Arc::clone(&share_repo),
        Arc::clone(&note_repo),
        Arc::clone(&document_service),
        Duration::from_secs(config.share.cleanup_delay_seconds),
    ));
    let notification_service = Arc::new(NotificationService::new(notif_repo));
    let site_service = Arc::new(SiteService::new(site_repo, story_repo));
    let spotify = Arc::new(SpotifyClient::new(config.spotify.clone())?);

    if !spotify.is_configured() {
        tracing::warn!("Spotify credentials missing; /api/spotify/login will return 503");
    }

    Ok(AppState {
        config: Arc::new(config),
        started_at: Instant::now(),
        store,
        storage,
        spotify,
        note_service,
        document_service,
        share_service,
        access_service,
        notification_service,
        site_service,
    })
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Runs the NoteNest server until Ctrl+C or SIGTERM.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    tracing::info!("Starting NoteNest server...");

    // ── Step 1: Capabilities ─────────────────────────────────────
    let store = notenest_database::connect(&config.database).await?;
    let storage: Arc<dyn StorageProvider> =
        Arc::new(LocalStorageProvider::new(&config.storage.root_path).await?);
    tracing::info!(
        store = store.provider_type(),
        storage = storage.provider_type(),
        root = %config.storage.root_path,
        "Backends ready"
    );

    // ── Step 2: State ────────────────────────────────────────────
    let state = build_state(config.clone(), store, storage)?;

    // ── Step 3: Scheduled maintenance ────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let scheduler = CronScheduler::new().await?;
        let sweep = Arc::new(ShareSweepJob::new(Arc::clone(&state.share_service)));
        scheduler
            .register_share_sweep(&config.worker.share_sweep_cron, sweep)
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    // ── Step 4: HTTP server ──────────────────────────────────────
    let app = build_app(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("NoteNest server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler did not shut down cleanly");
        }
    }

    tracing::info!("NoteNest server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
