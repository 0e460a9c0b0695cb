//! Integration tests for the Spotify OAuth flow and playback proxy,
//! run against a local mock of the accounts service and Web API.

mod helpers;

use std::net::SocketAddr;

use axum::Router;
use axum::http::{HeaderMap, StatusCode as AxumStatus};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use http::StatusCode;
use http::header::LOCATION;
use serde_json::json;

const AUTH: &str = "spotify_access_token=valid-token";

async fn token_endpoint(body: String) -> impl IntoResponse {
    if body.contains("code=good-code") || body.contains("refresh_token=good-refresh") {
        (
            AxumStatus::OK,
            axum::Json(json!({
                "access_token": "fresh-access",
                "refresh_token": "fresh-refresh",
                "expires_in": 3600,
                "token_type": "Bearer",
            })),
        )
    } else {
        (
            AxumStatus::BAD_REQUEST,
            axum::Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid authorization code",
            })),
        )
    }
}

async fn player(headers: HeaderMap) -> impl IntoResponse {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer valid-token") => (
            AxumStatus::OK,
            axum::Json(json!({ "is_playing": true, "item": { "name": "Song" } })),
        )
            .into_response(),
        Some("Bearer idle-token") => AxumStatus::NO_CONTENT.into_response(),
        _ => (
            AxumStatus::UNAUTHORIZED,
            axum::Json(json!({ "error": { "status": 401, "message": "Invalid access token" } })),
        )
            .into_response(),
    }
}

async fn devices() -> impl IntoResponse {
    (AxumStatus::TOO_MANY_REQUESTS, [("retry-after", "7")], "")
}

async fn no_content() -> AxumStatus {
    AxumStatus::NO_CONTENT
}

async fn no_device() -> impl IntoResponse {
    (
        AxumStatus::NOT_FOUND,
        axum::Json(json!({
            "error": { "status": 404, "message": "Player command failed: No active device found" }
        })),
    )
}

async fn playlists() -> impl IntoResponse {
    axum::Json(json!({ "items": [{ "name": "Focus" }], "total": 1 }))
}

/// Starts the mock and returns its address.
async fn spawn_mock() -> SocketAddr {
    let app = Router::new()
        .route("/api/token", post(token_endpoint))
        .route("/v1/me/player", get(player))
        .route("/v1/me/player/devices", get(devices))
        .route("/v1/me/player/pause", put(no_content))
        .route("/v1/me/player/next", post(no_device))
        .route("/v1/me/playlists", get(playlists));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn spotify_app() -> helpers::TestApp {
    let addr = spawn_mock().await;
    let mut config = helpers::TestApp::test_config();
    config.spotify.client_id = "client".to_string();
    config.spotify.client_secret = "secret".to_string();
    config.spotify.accounts_base = format!("http://{addr}");
    config.spotify.api_base = format!("http://{addr}/v1");
    config.spotify.post_login_redirect = "http://localhost:3000/spotify".to_string();
    helpers::TestApp::with_config(config).await
}

#[tokio::test]
async fn test_playback_requires_cookie() {
    let app = spotify_app().await;
    let response = app.request("GET", "/api/spotify/player", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_expired_cookie_rejected() {
    let app = spotify_app().await;
    let cookie = format!("{AUTH}; spotify_token_expiry=1000");
    let response = app.request("GET", "/api/spotify/player", None, Some(&cookie)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_redirects_with_state() {
    let app = spotify_app().await;
    let response = app.request("GET", "/api/spotify/login", None, None).await;

    assert!(response.status.is_redirection());
    let location = response.headers[LOCATION].to_str().unwrap();
    assert!(location.contains("/authorize?"));
    assert!(location.contains("client_id=client"));

    let state_cookie = response.cookie("spotify_auth_state").unwrap();
    assert!(state_cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_login_unconfigured() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/spotify/login", None, None).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_callback_sets_token_cookies() {
    let app = spotify_app().await;
    let response = app
        .request(
            "GET",
            "/api/spotify/callback?code=good-code&state=abc",
            None,
            Some("spotify_auth_state=abc"),
        )
        .await;

    assert!(response.status.is_redirection(), "{:?}", response.body);
    assert_eq!(
        response.headers[LOCATION],
        "http://localhost:3000/spotify"
    );

    let access = response.cookie("spotify_access_token").unwrap();
    assert!(access.starts_with("spotify_access_token=fresh-access"));
    assert!(access.contains("HttpOnly"));
    assert!(access.contains("SameSite=Lax"));
    assert!(access.contains("Path=/"));
    assert!(response.cookie("spotify_refresh_token").is_some());
    assert!(response.cookie("spotify_token_expiry").is_some());
}

#[tokio::test]
async fn test_callback_state_mismatch() {
    let app = spotify_app().await;
    let response = app
        .request(
            "GET",
            "/api/spotify/callback?code=good-code&state=abc",
            None,
            Some("spotify_auth_state=other"),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_callback_rejected_code() {
    let app = spotify_app().await;
    let response = app
        .request(
            "GET",
            "/api/spotify/callback?code=bad-code&state=abc",
            None,
            Some("spotify_auth_state=abc"),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh() {
    let app = spotify_app().await;

    let response = app.request("POST", "/api/spotify/refresh", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            "POST",
            "/api/spotify/refresh",
            None,
            Some("spotify_refresh_token=good-refresh"),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["expiresIn"], 3600);
    assert!(
        response
            .cookie("spotify_access_token")
            .unwrap()
            .contains("fresh-access")
    );
}

#[tokio::test]
async fn test_logout_clears_cookies() {
    let app = spotify_app().await;
    let response = app.request("POST", "/api/spotify/logout", None, Some(AUTH)).await;
    assert_eq!(response.status, StatusCode::OK);

    let cleared = response.cookie("spotify_access_token").unwrap();
    assert!(cleared.starts_with("spotify_access_token=;"));
}

#[tokio::test]
async fn test_player_state() {
    let app = spotify_app().await;

    let response = app.request("GET", "/api/spotify/player", None, Some(AUTH)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["is_playing"], true);

    let response = app
        .request(
            "GET",
            "/api/spotify/player",
            None,
            Some("spotify_access_token=idle-token"),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.data().is_null());

    let response = app
        .request(
            "GET",
            "/api/spotify/player",
            None,
            Some("spotify_access_token=revoked"),
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_playback_commands() {
    let app = spotify_app().await;

    let response = app.request("PUT", "/api/spotify/pause", None, Some(AUTH)).await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("POST", "/api/spotify/next", None, Some(AUTH)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(
        response.body["message"]
            .as_str()
            .unwrap()
            .contains("No active device")
    );

    let response = app
        .request(
            "PUT",
            "/api/spotify/volume",
            Some(json!({ "volumePercent": 150 })),
            Some(AUTH),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rate_limit_passthrough() {
    let app = spotify_app().await;
    let response = app.request("GET", "/api/spotify/devices", None, Some(AUTH)).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert!(response.body["message"].as_str().unwrap().contains('7'));
}

#[tokio::test]
async fn test_playlists() {
    let app = spotify_app().await;
    let response = app
        .request("GET", "/api/spotify/playlists?limit=10", None, Some(AUTH))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["items"][0]["name"], "Focus");
}
