//! Route definitions for the NoteNest HTTP API.
//!
//! REST routes are grouped by domain and mounted under `/api`; the change
//! feed lives at `/ws/{collection}`.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Room for multipart boundaries and the other form fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let api_routes = Router::new()
        .merge(note_routes())
        .merge(document_routes())
        .merge(share_routes())
        .merge(notification_routes())
        .merge(site_routes())
        .merge(spotify_routes())
        .merge(health_routes());

    let ws_routes = Router::new().route("/ws/{collection}", get(handlers::ws::ws_upgrade));

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Note CRUD
fn note_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notes",
            get(handlers::note::list_notes).post(handlers::note::create_note),
        )
        .route(
            "/notes/{id}",
            get(handlers::note::get_note)
                .put(handlers::note::update_note)
                .delete(handlers::note::delete_note),
        )
}

/// Document upload, URL resolution, download
fn document_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/documents",
            get(handlers::document::list_documents).post(handlers::document::upload_document),
        )
        .route(
            "/documents/{id}",
            get(handlers::document::get_document).delete(handlers::document::delete_document),
        )
        .route("/documents/{id}/url", get(handlers::document::document_url))
        .route(
            "/documents/{id}/download",
            get(handlers::document::download_document),
        )
}

/// Share link issuance and public redemption
fn share_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/shares",
            get(handlers::share::list_shares).post(handlers::share::create_share),
        )
        .route(
            "/shares/{token}",
            get(handlers::share::resolve_share).delete(handlers::share::revoke_share),
        )
        .route(
            "/shares/{token}/consume",
            post(handlers::share::consume_share),
        )
}

/// Notifications
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications)
                .post(handlers::notification::create_notification),
        )
        .route(
            "/notifications/{id}",
            delete(handlers::notification::delete_notification),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
}

/// Config values, realtime commands, stories
fn site_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/config/{key}",
            get(handlers::site::get_config).put(handlers::site::set_config),
        )
        .route(
            "/commands/metadata",
            get(handlers::site::get_command_metadata).put(handlers::site::set_command_metadata),
        )
        .route(
            "/stories",
            get(handlers::story::list_stories).post(handlers::story::create_story),
        )
}

/// Spotify OAuth and playback proxy
fn spotify_routes() -> Router<AppState> {
    Router::new()
        .route("/spotify/login", get(handlers::spotify::login))
        .route("/spotify/callback", get(handlers::spotify::callback))
        .route("/spotify/refresh", post(handlers::spotify::refresh))
        .route("/spotify/logout", post(handlers::spotify::logout))
        .route("/spotify/player", get(handlers::spotify::player))
        .route("/spotify/devices", get(handlers::spotify::devices))
        .route("/spotify/play", put(handlers::spotify::play))
        .route("/spotify/pause", put(handlers::spotify::pause))
        .route("/spotify/next", post(handlers::spotify::next))
        .route("/spotify/previous", post(handlers::spotify::previous))
        .route("/spotify/seek", put(handlers::spotify::seek))
        .route("/spotify/volume", put(handlers::spotify::volume))
        .route("/spotify/shuffle", put(handlers::spotify::shuffle))
        .route("/spotify/repeat", put(handlers::spotify::repeat))
        .route("/spotify/transfer", put(handlers::spotify::transfer))
        .route("/spotify/playlists", get(handlers::spotify::playlists))
        .route("/spotify/liked-tracks", get(handlers::spotify::liked_tracks))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
